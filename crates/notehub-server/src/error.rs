//! API error types.
//!
//! Every handler boundary translates into one of these; the `IntoResponse`
//! impl maps them to an HTTP status plus the standard error envelope, so no
//! error escapes as a crash.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notehub_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The remote store or OAuth provider could not be reached, or kept
    /// failing after the retry budget was spent.
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Remote content that should be JSON is not.
    #[error("malformed remote content: {0}")]
    Decode(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RemoteUnavailable(_) | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::RemoteUnavailable(msg) => ApiError::RemoteUnavailable(msg),
            StoreError::Conflict { path } => {
                ApiError::Conflict(format!("concurrent update on '{}', please retry", path))
            }
            StoreError::Decode { path, reason } => {
                ApiError::Decode(format!("'{}': {}", path, reason))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
