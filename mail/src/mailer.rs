//! The delivery seam.

use async_trait::async_trait;
use village_types::{AccessCode, Email};

use crate::error::MailError;

/// Sends an account's access code to its owner.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_access_code_email(&self, to: &Email, code: &AccessCode)
        -> Result<(), MailError>;
}

/// Mailer used when no provider key is configured: logs and fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_access_code_email(
        &self,
        to: &Email,
        _code: &AccessCode,
    ) -> Result<(), MailError> {
        tracing::warn!(to = %to, "mail delivery is not configured; dropping access code email");
        Err(MailError::Delivery("mail delivery is not configured".to_string()))
    }
}
