use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sellerdesk_services::auth::AuthError;
use sellerdesk_services::messaging::MessagingError;
use sellerdesk_services::store::StoreError;

pub const GENERIC_UNAUTHORIZED: &str = "Unauthorized";
pub const GENERIC_FORBIDDEN: &str = "Forbidden";
pub const GENERIC_INTERNAL: &str = "Something went wrong, please try again";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Internal(String),
    Validation(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                GENERIC_UNAUTHORIZED.to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                GENERIC_FORBIDDEN.to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    GENERIC_INTERNAL.to_string(),
                )
            }
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation", msg),
        };

        let body = ErrorResponse {
            success: false,
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashError(detail) => ApiError::Internal(detail),
            other => {
                tracing::debug!(reason = %other, "Rejected credentials");
                ApiError::Unauthorized
            }
        }
    }
}

impl From<MessagingError> for ApiError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::Unauthorized | MessagingError::Disabled => ApiError::Forbidden,
            e @ MessagingError::Validation { .. } => ApiError::Validation(e.to_string()),
            MessagingError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            MessagingError::Store(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = err
            .field_errors()
            .keys()
            .map(|field| format!("{field}: invalid value"))
            .collect();
        ApiError::Validation(fields.join(", "))
    }
}
