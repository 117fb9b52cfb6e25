use axum::extract::{Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, middleware::Next};
use serde::Deserialize;
use serde_json::json;
use sellerdesk_services::access::{GateDecision, GateRequest};

use crate::extractors::auth::{AuthUser, token_from_parts};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct GateQuery {
    redirect_to: Option<String>,
}

/// Dashboard access control, run on every request.
///
/// Anonymous visitors to the dashboard are sent to the login page once;
/// if they come back still anonymous with `redirect_to` already pointing at
/// the dashboard, they get a 401 instead of another redirect.
pub async fn dashboard_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let query = Query::<GateQuery>::try_from_uri(req.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();

    let (parts, body) = req.into_parts();
    let authenticated = token_from_parts(&parts)
        .is_some_and(|token| AuthUser::from_token(&state, &token).is_ok());

    let decision = state.gate.decide(&GateRequest {
        path: parts.uri.path(),
        authenticated,
        redirect_to: query.redirect_to.as_deref(),
    });

    match decision {
        GateDecision::Allow => next.run(Request::from_parts(parts, body)).await,
        GateDecision::RedirectToLogin { location } => {
            tracing::debug!(path = %parts.uri.path(), %location, "Redirecting anonymous visitor to login");
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        GateDecision::LoginRequired => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "login_required",
                "message": "Please log in to view the dashboard",
                "login_url": state.settings.dashboard.login_path,
            })),
        )
            .into_response(),
    }
}
