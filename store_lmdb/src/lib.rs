//! LMDB storage backend for the village service.
//!
//! Implements all storage traits from `village-store` using the `heed` LMDB
//! bindings. Each logical store maps to one or more LMDB databases within a
//! single environment. Records are `bincode`-encoded; secondary indexes map a
//! unique key to the owning record's id.
//!
//! LMDB allows a single writer at a time, so every check-then-write that runs
//! inside one write transaction is atomic with respect to other writers.

pub mod account;
pub mod city;
mod codec;
pub mod contact;
pub mod environment;
pub mod error;
pub mod group;
pub mod listing;
pub mod migration;

pub use account::LmdbAccountStore;
pub use city::LmdbCityStore;
pub use contact::LmdbContactStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use group::LmdbGroupStore;
pub use listing::LmdbListingStore;
