use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
};
use sellerdesk_db::models::User;
use sellerdesk_services::access::Identity;
use sellerdesk_services::auth::password;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, json::JsonBody},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub roles: Vec<String>,
    pub primary_role: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub(crate) fn session_cookie(token: &str, max_age: u64) -> Result<HeaderMap, ApiError> {
    let cookie = format!("access_token={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}");
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    Ok(headers)
}

pub(crate) fn cleared_session_cookie() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static("access_token=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0"),
    );
    headers
}

fn user_response(state: &AppState, user: User) -> Result<UserResponse, ApiError> {
    let id = user.id.ok_or(ApiError::Unauthorized)?;
    let primary_role = state.resolver.primary_role(&user.roles).to_string();
    Ok(UserResponse {
        id: id.to_hex(),
        email: user.email,
        username: user.username,
        display_name: user.display_name,
        avatar: user.avatar,
        roles: user.roles,
        primary_role,
    })
}

fn issue_session(state: &AppState, user: User) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let tokens = state.auth.generate_tokens(&user)?;
    let headers = session_cookie(&tokens.access_token, tokens.expires_in)?;

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: user_response(state, user)?,
    };

    Ok((headers, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    body.validate()?;

    let user = if let Some(ref username) = body.username {
        state.users.find_by_username(username).await?
    } else if let Some(ref email) = body.email {
        state.users.find_by_email(email).await?
    } else {
        return Err(ApiError::BadRequest("Either username or email is required".to_string()));
    }
    .ok_or(ApiError::Unauthorized)?;

    let password_hash = user.password_hash.as_deref().ok_or(ApiError::Unauthorized)?;
    if !password::verify_password(&body.password, password_hash)? {
        return Err(ApiError::Unauthorized);
    }

    tracing::info!(user_id = ?user.id, "User logged in");
    issue_session(&state, user)
}

pub async fn logout() -> HeaderMap {
    cleared_session_cookie()
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .users
        .get_user(auth.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let identity = Identity::from(&user);
    let capabilities = state.resolver.resolve(&identity).clone();
    let permissions = state.resolver.permissions(&identity);

    Ok(Json(serde_json::json!({
        "user": user_response(&state, user)?,
        "capabilities": capabilities,
        "permissions": permissions,
    })))
}

pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let claims = state.auth.verify_refresh_token(&body.refresh_token)?;
    let user = state
        .users
        .get_user(claims.user_id()?)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    issue_session(&state, user)
}
