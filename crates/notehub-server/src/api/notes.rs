use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::extract::{Session, bearer_token};
use crate::api::state::AppState;
use crate::api_response::{success, success_with_message};
use crate::error::ApiError;
use crate::services;
use crate::services::notes::SaveNote;

#[derive(Debug, Deserialize)]
pub struct SaveNoteRequest {
    // The legacy form surface called this field `noteId`.
    #[serde(default, alias = "noteId")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub title: String,
}

/// List the caller's notes; `?approved=true` filters to approved-only.
pub async fn list_notes(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListNotesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = services::notes::list(&state, &session.username, query.approved).await?;
    Ok(success(notes))
}

pub async fn get_note(
    State(state): State<AppState>,
    _session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let note = services::notes::get(&state, &id).await?;
    Ok(success(note))
}

/// Save a note from a JSON body.
pub async fn save_note(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SaveNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    save_for(&state, &session.username, payload).await
}

/// Legacy `/save` surface: form-encoded `noteId`/`content`.
pub async fn save_note_form(
    State(state): State<AppState>,
    session: Session,
    Form(payload): Form<SaveNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    save_for(&state, &session.username, payload).await
}

async fn save_for(
    state: &AppState,
    user: &str,
    payload: SaveNoteRequest,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = services::notes::save(
        state,
        user,
        SaveNote {
            id: payload.id,
            title: payload.title,
            content: payload.content,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        success_with_message(json!({ "id": id }), "note saved".to_string()),
    ))
}

/// Approve a note by title. Requires a provider bearer token, validated by
/// forwarding it to the provider's user-info endpoint.
pub async fn approve_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ApproveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::Forbidden("no OAuth provider is configured".to_string()))?;

    let token = bearer_token(&headers)?;
    let reviewer = oauth.fetch_user(token).await?;
    let reviewer = reviewer
        .identifier()
        .ok_or_else(|| ApiError::Unauthorized("provider returned an anonymous profile".to_string()))?
        .to_string();

    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }

    services::notes::approve(&state, &payload.title).await?;
    Ok(success_with_message(
        json!({ "title": payload.title }),
        format!("approved by {}", reviewer),
    ))
}
