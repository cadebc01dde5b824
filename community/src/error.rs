use thiserror::Error;
use village_store::StoreError;

/// `Rejected` and `NotFound` messages are user-facing.
#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CommunityError {
    pub(crate) fn rejected(msg: impl Into<String>) -> Self {
        CommunityError::Rejected(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        CommunityError::NotFound(msg.into())
    }
}
