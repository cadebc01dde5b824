//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use village_community::CommunityError;
use village_mail::MailError;
use village_store::StoreError;
use village_verification::{SessionError, ValidationError, VerificationError};

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Every variant's message is sent to the client as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Resubmitting the same request may succeed.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),

    /// The listener itself failed; never produced by a handler.
    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        RpcError::InvalidRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RpcError::NotFound(_) => StatusCode::NOT_FOUND,
            RpcError::Conflict(_) => StatusCode::CONFLICT,
            RpcError::Internal(_) | RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RpcError::Conflict(msg) => json!({ "error": msg, "retryable": true }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for RpcError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "store failure");
        RpcError::Internal(INTERNAL_MESSAGE.to_string())
    }
}

impl From<ValidationError> for RpcError {
    fn from(e: ValidationError) -> Self {
        RpcError::InvalidRequest(e.message.to_string())
    }
}

impl From<VerificationError> for RpcError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::CreationConflict { .. } => RpcError::Conflict(
                "Your account could not be created because of a conflicting registration. \
                 Please submit again."
                    .to_string(),
            ),
            VerificationError::Store(e) => e.into(),
            other => {
                tracing::error!(error = %other, "verification failure");
                RpcError::Internal(
                    "Verification failed. Please check your answers and try again.".to_string(),
                )
            }
        }
    }
}

impl From<SessionError> for RpcError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Store(e) => e.into(),
            auth => RpcError::Unauthorized(auth.to_string()),
        }
    }
}

impl From<CommunityError> for RpcError {
    fn from(e: CommunityError) -> Self {
        match e {
            CommunityError::Rejected(msg) => RpcError::InvalidRequest(msg),
            CommunityError::NotFound(msg) => RpcError::NotFound(msg),
            CommunityError::Store(e) => e.into(),
        }
    }
}

impl From<tokio::task::JoinError> for RpcError {
    fn from(e: tokio::task::JoinError) -> Self {
        tracing::error!(error = %e, "blocking store task failed");
        RpcError::Internal(INTERNAL_MESSAGE.to_string())
    }
}

impl From<MailError> for RpcError {
    fn from(e: MailError) -> Self {
        match e {
            MailError::InvalidRequest(msg) => RpcError::InvalidRequest(msg),
            MailError::Delivery(detail) => {
                tracing::warn!(detail = %detail, "recovery email not delivered");
                RpcError::Internal("Failed to send recovery email. Please try again.".to_string())
            }
            MailError::Client(detail) => {
                tracing::error!(detail = %detail, "mail client unavailable");
                RpcError::Internal(INTERNAL_MESSAGE.to_string())
            }
            MailError::Store(e) => e.into(),
        }
    }
}
