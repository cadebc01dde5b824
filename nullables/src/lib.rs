//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! All external dependencies (clock, storage, random, mail delivery) are
//! abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod mailer;
pub mod random;
pub mod store;

pub use clock::NullClock;
pub use mailer::NullMailer;
pub use random::NullRandom;
pub use store::NullStore;
