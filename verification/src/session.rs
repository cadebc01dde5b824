//! Access code to account resolution.

use std::sync::Arc;

use village_store::account::{AccountRecord, AccountStore};
use village_types::AccessCode;

use crate::error::SessionError;

/// Resolves a presented access code to its account.
///
/// Codes never expire and are compared exactly; surrounding whitespace from
/// copy-paste is ignored.
pub struct SessionResolver {
    accounts: Arc<dyn AccountStore + Send + Sync>,
}

impl SessionResolver {
    pub fn new(accounts: Arc<dyn AccountStore + Send + Sync>) -> Self {
        Self { accounts }
    }

    pub fn resolve(&self, presented: &str) -> Result<AccountRecord, SessionError> {
        let code = presented.trim();
        if code.is_empty() {
            return Err(SessionError::MissingCode);
        }
        self.accounts
            .find_by_access_code(&AccessCode::new(code))?
            .ok_or(SessionError::UnknownCode)
    }
}
