//! Access-code authentication for protected routes.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use village_store::AccountRecord;

use crate::error::RpcError;
use crate::server::RpcState;

pub const ACCESS_CODE_HEADER: &str = "x-access-code";

/// The account behind the request's `x-access-code` header.
///
/// A missing header and an unknown code both reject with 401.
pub struct CurrentUser(pub AccountRecord);

#[async_trait]
impl FromRequestParts<Arc<RpcState>> for CurrentUser {
    type Rejection = RpcError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<RpcState>,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ACCESS_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Ok(CurrentUser(state.sessions.resolve(presented)?))
    }
}
