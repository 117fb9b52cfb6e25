use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sellerdesk_services::access::{CapabilitySet, Identity, TabAction, TabRoute};
use serde::Serialize;

use super::auth::cleared_session_cookie;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Serialize)]
pub struct DashboardUser {
    pub id: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub primary_role: String,
}

#[derive(Debug, Serialize)]
pub struct MenuEntry {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub url: String,
    pub active: bool,
    pub has_unread_counter: bool,
}

/// Everything an external renderer needs to draw one dashboard page.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub success: bool,
    pub user: DashboardUser,
    pub menu: Vec<MenuEntry>,
    pub current_tab: TabRoute,
    pub capabilities: CapabilitySet,
    pub unread_count: usize,
    pub messaging_enabled: bool,
    pub poll_interval_secs: u64,
}

pub async fn view(state: State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    render(state, auth, None).await
}

pub async fn view_tab(
    state: State<AppState>,
    auth: AuthUser,
    Path(tab): Path<String>,
) -> Result<Response, ApiError> {
    render(state, auth, Some(tab)).await
}

async fn render(
    State(state): State<AppState>,
    auth: AuthUser,
    requested: Option<String>,
) -> Result<Response, ApiError> {
    let user = state
        .users
        .get_user(auth.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    let identity = Identity::from(&user);

    let route = state.tabs.route(&identity, requested.as_deref());
    if route.action == TabAction::Logout {
        tracing::info!(user_id = %auth.user_id, "User logged out from dashboard");
        return Ok((StatusCode::FOUND, cleared_session_cookie(), [(header::LOCATION, "/")]).into_response());
    }
    if route.fell_back {
        tracing::debug!(user_id = %auth.user_id, requested = ?requested, "Tab not visible, serving overview");
    }

    let base_url = &state.settings.app.base_url;
    let dashboard = &state.settings.dashboard;
    let menu = state
        .resolver
        .visible_menu(&identity)
        .into_iter()
        .map(|item| MenuEntry {
            key: item.key.clone(),
            label: item.label.clone(),
            icon: item.icon.clone(),
            url: dashboard.tab_url(base_url, &item.key),
            active: item.key == route.key,
            has_unread_counter: item.has_unread_counter,
        })
        .collect();

    let view = DashboardView {
        success: true,
        user: DashboardUser {
            id: auth.user_id.to_hex(),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
            primary_role: state.resolver.primary_role(&user.roles).to_string(),
        },
        menu,
        capabilities: state.resolver.resolve(&identity).clone(),
        current_tab: route,
        unread_count: state.counter.unread_count(auth.user_id).await?,
        messaging_enabled: state.inbox.is_enabled(),
        poll_interval_secs: state.settings.messaging.poll_interval_secs,
    };

    Ok(Json(view).into_response())
}

/// Client bootstrap: the anti-forgery nonce and the URLs the dashboard
/// script talks to.
pub async fn session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "user_id": auth.user_id.to_hex(),
        "nonce": state.nonces.create(auth.user_id),
        "dashboard_url": state.settings.dashboard_url(),
        "login_url": state.settings.dashboard.login_path,
        "unread_count_url": "/api/inbox/unread-count",
        "messaging_enabled": state.inbox.is_enabled(),
        "poll_interval_secs": state.settings.messaging.poll_interval_secs,
    }))
}
