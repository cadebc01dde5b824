use thiserror::Error;
use village_store::StoreError;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("mail delivery failed: {0}")]
    Delivery(String),

    #[error("mail client setup failed: {0}")]
    Client(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
