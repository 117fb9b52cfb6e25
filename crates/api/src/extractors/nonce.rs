use axum::{extract::FromRequestParts, http::request::Parts};

use super::auth::AuthUser;
use crate::{error::ApiError, state::AppState};

pub const NONCE_HEADER: &str = "x-dashboard-nonce";

/// An authenticated user whose request carries a valid anti-forgery nonce.
/// Rejects with 403 before the handler runs.
#[derive(Debug, Clone)]
pub struct NonceCheckedUser(pub AuthUser);

impl FromRequestParts<AppState> for NonceCheckedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let nonce = parts
            .headers
            .get(NONCE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !state.nonces.verify(user.user_id, nonce) {
            tracing::warn!(user_id = %user.user_id, "Rejected request with a bad nonce");
            return Err(ApiError::Forbidden);
        }

        Ok(NonceCheckedUser(user))
    }
}
