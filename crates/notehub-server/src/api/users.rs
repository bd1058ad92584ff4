use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;

use crate::api::state::AppState;
use crate::api_response::{success, success_with_message};
use crate::error::ApiError;
use crate::services;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    services::users::register(&state, &payload.username, &payload.password).await?;
    Ok((
        StatusCode::CREATED,
        success_with_message(
            json!({ "username": payload.username }),
            "registered".to_string(),
        ),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = services::users::login(&state, &payload.username, &payload.password).await?;
    Ok(success(json!({
        "username": payload.username,
        "token": token,
    })))
}

/// Tokens are time-bound and not stored server-side; logging out is simply
/// discarding the token client-side.
pub async fn logout() -> impl IntoResponse {
    success_with_message(serde_json::Value::Null, "logged out".to_string())
}
