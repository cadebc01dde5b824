//! Account storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use village_types::{AccessCode, AccountId, Email, Timestamp};

/// A verified attendee account.
///
/// Created exactly once, when a quiz submission passes. Only `phone` (and
/// `updated_at`) change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    /// Unique, compared case-insensitively (stored canonical).
    pub email: Email,
    /// Unique, compared case-sensitively; original case preserved.
    pub identity_url: String,
    /// Unique bearer credential.
    pub access_code: AccessCode,
    /// Set by the listing flow, absent until then.
    pub phone: Option<String>,
    pub verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AccountRecord {
    /// Build a fresh verified record with a generated id.
    pub fn new_verified(
        email: Email,
        identity_url: impl Into<String>,
        access_code: AccessCode,
        now: Timestamp,
    ) -> Self {
        Self {
            id: AccountId::generate(),
            email,
            identity_url: identity_url.into(),
            access_code,
            phone: None,
            verified: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trait for account storage operations.
pub trait AccountStore {
    fn find_by_id(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError>;

    fn find_by_email(&self, email: &Email) -> Result<Option<AccountRecord>, StoreError>;

    /// Exact, case-sensitive match.
    fn find_by_identity_url(&self, url: &str) -> Result<Option<AccountRecord>, StoreError>;

    fn find_by_access_code(&self, code: &AccessCode)
        -> Result<Option<AccountRecord>, StoreError>;

    /// Atomically insert a new account.
    ///
    /// Fails with [`StoreError::Duplicate`] naming the first violated key when
    /// the email, identity URL or access code is already registered; nothing
    /// is written in that case.
    fn insert(&self, record: &AccountRecord) -> Result<AccountRecord, StoreError>;

    /// Update the incidental phone field.
    fn set_phone(
        &self,
        id: &AccountId,
        phone: &str,
        now: Timestamp,
    ) -> Result<AccountRecord, StoreError>;

    fn account_count(&self) -> Result<u64, StoreError>;
}
