pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use sellerdesk_config::AppSettings;
use state::AppState;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use extractors::nonce::NONCE_HEADER;

/// Any origin when none are configured; otherwise only the listed origins,
/// with credentials so the session cookie crosses over.
pub fn cors_layer(app: &AppSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = app
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(NONCE_HEADER),
        ])
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app);

    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/refresh", post(routes::auth::refresh))
        .route("/me", get(routes::auth::me));

    let inbox_routes = Router::new()
        .route("/", get(routes::inbox::get_inbox))
        .route("/thread", post(routes::inbox::get_thread))
        .route("/reply", post(routes::inbox::send_reply))
        .route("/read", post(routes::inbox::mark_thread_read))
        .route("/unread-count", get(routes::inbox::get_unread_count));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/inbox", inbox_routes)
        .route("/dashboard/session", get(routes::dashboard::session));

    let root = format!("/{}", state.settings.dashboard.path.trim_matches('/'));
    let dashboard = Router::new()
        .route(&root, get(routes::dashboard::view))
        .route(&format!("{root}/"), get(routes::dashboard::view))
        .route(&format!("{root}/{{tab}}"), get(routes::dashboard::view_tab))
        .route(&format!("{root}/{{tab}}/"), get(routes::dashboard::view_tab));

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(dashboard)
        .merge(health)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::gate::dashboard_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
