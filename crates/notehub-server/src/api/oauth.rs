//! OAuth login flow: redirect out, exchange the code on the way back.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::state::AppState;
use crate::api_response::success;
use crate::auth::OAuthClient;
use crate::error::ApiError;

use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn provider(state: &AppState) -> Result<&Arc<OAuthClient>, ApiError> {
    state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("no OAuth provider is configured".to_string()))
}

/// `GET /login`: bounce the browser to the provider's authorize page.
pub async fn oauth_login(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let url = provider(&state)?.authorize_url()?;
    Ok(Redirect::temporary(&url))
}

/// `GET|POST /callback?code=...`: exchange the code, look up the profile,
/// and hand back a signed session token.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let oauth = provider(&state)?;

    if let Some(error) = query.error {
        return Err(ApiError::Unauthorized(format!(
            "provider returned an error: {}",
            error
        )));
    }
    let code = query
        .code
        .ok_or_else(|| ApiError::BadRequest("missing code parameter".to_string()))?;

    let access_token = oauth.exchange_code(&code).await?;
    let profile = oauth.fetch_user(&access_token).await?;
    let username = profile
        .identifier()
        .ok_or_else(|| ApiError::Decode("provider profile has no usable identifier".to_string()))?;

    info!("OAuth login for {}", username);
    let session = state.sessions.mint(username)?;
    Ok(success(json!({
        "username": username,
        "token": session,
    })))
}
