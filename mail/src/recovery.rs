//! Access code recovery by email.

use std::sync::Arc;

use village_store::account::AccountStore;
use village_types::Email;

use crate::error::MailError;
use crate::mailer::Mailer;

/// What happened to a recovery request. Callers must report both variants
/// identically so the response does not reveal whether an account exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryStatus {
    Sent,
    Unknown,
}

pub struct CodeRecovery {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    mailer: Arc<dyn Mailer>,
}

impl CodeRecovery {
    pub fn new(accounts: Arc<dyn AccountStore + Send + Sync>, mailer: Arc<dyn Mailer>) -> Self {
        Self { accounts, mailer }
    }

    pub async fn recover(&self, raw_email: &str) -> Result<RecoveryStatus, MailError> {
        let email = Email::new(raw_email);
        if email.is_empty() {
            return Err(MailError::InvalidRequest("Email is required".to_string()));
        }

        let Some(account) = self.accounts.find_by_email(&email)? else {
            tracing::info!(email = %email, "code recovery requested for unknown email");
            return Ok(RecoveryStatus::Unknown);
        };

        self.mailer
            .send_access_code_email(&account.email, &account.access_code)
            .await?;
        tracing::info!(email = %account.email, code = ?account.access_code, "access code recovered");
        Ok(RecoveryStatus::Sent)
    }
}
