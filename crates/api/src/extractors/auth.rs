use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use bson::oid::ObjectId;
use sellerdesk_services::auth::Claims;

use crate::{error::ApiError, state::AppState};

pub const ACCESS_COOKIE: &str = "access_token";

/// Extracts the authenticated user from JWT (cookie or Authorization header)
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub email: String,
    pub username: String,
    pub claims: Claims,
}

/// Like [`AuthUser`], but anonymous callers are let through as `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

/// Bearer token first, then the `access_token` cookie.
pub fn token_from_parts(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| {
            parts
                .headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        cookie
                            .trim()
                            .strip_prefix("access_token=")
                            .filter(|s| !s.is_empty())
                            .map(|s| s.to_string())
                    })
                })
        })
}

impl AuthUser {
    pub(crate) fn from_token(state: &AppState, token: &str) -> Result<Self, ApiError> {
        let claims = state.auth.verify_access_token(token)?;
        let user_id = claims.user_id()?;

        Ok(AuthUser {
            user_id,
            email: claims.email.clone(),
            username: claims.username.clone(),
            claims,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(ApiError::Unauthorized)?;
        AuthUser::from_token(state, &token)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = token_from_parts(parts).and_then(|token| AuthUser::from_token(state, &token).ok());
        Ok(MaybeAuthUser(user))
    }
}
