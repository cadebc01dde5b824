use thiserror::Error;
use village_store::StoreError;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("invalid answer key: {0}")]
    InvalidAnswerKey(String),

    /// The submission passed and both duplicate checks cleared, but the
    /// account insert hit a uniqueness constraint (a concurrent registration
    /// or an access-code collision). Resubmitting is safe.
    #[error("account creation conflict on {key}")]
    CreationConflict { key: &'static str },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl VerificationError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, VerificationError::CreationConflict { .. })
    }
}

/// The first rule a submission broke; `message` is shown to the user as is.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Authentication required")]
    MissingCode,

    #[error("Invalid session")]
    UnknownCode,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
