//! Email delivery for the access-code recovery flow.
//!
//! [`Mailer`] is the delivery seam: [`ResendMailer`] talks to the Resend HTTP
//! API, [`DisabledMailer`] stands in when no API key is configured.
//! [`CodeRecovery`] looks an account up by email and mails its code without
//! revealing whether the account exists.

pub mod client;
pub mod error;
pub mod mailer;
pub mod recovery;
pub mod template;

pub use client::{ResendConfig, ResendMailer};
pub use error::MailError;
pub use mailer::{DisabledMailer, Mailer};
pub use recovery::{CodeRecovery, RecoveryStatus};
