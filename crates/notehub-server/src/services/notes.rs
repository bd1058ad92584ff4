//! Note operations: save, list, fetch, approve.

use chrono::Utc;
use uuid::Uuid;

use crate::api::AppState;
use crate::error::ApiError;
use crate::models::{Note, NoteView, NotesDoc};
use crate::services::{read_doc, update_doc};

#[derive(Debug, Default)]
pub struct SaveNote {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: String,
}

/// Insert or update one note. A missing id gets a generated one. Re-saving
/// an existing note keeps its approval state and comments.
pub async fn save(state: &AppState, user: &str, input: SaveNote) -> Result<String, ApiError> {
    if input.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content is required".to_string()));
    }
    let id = input
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let path = state.config.notes_path.clone();
    let message = format!("notehub: save note {}", id);
    update_doc::<NotesDoc, _>(state, &path, &message, |notes| {
        let note = notes.entry(id.clone()).or_default();
        if input.title.is_some() {
            note.title = input.title.clone();
        }
        note.content = input.content.clone();
        note.user = Some(user.to_string());
        if note.created_at.is_none() {
            note.created_at = Some(Utc::now());
        }
        true
    })
    .await?;

    Ok(id)
}

/// List the caller's notes, optionally restricted to approved ones.
pub async fn list(
    state: &AppState,
    user: &str,
    approved_only: bool,
) -> Result<Vec<NoteView>, ApiError> {
    let notes: NotesDoc = read_doc(state, &state.config.notes_path).await?;
    Ok(notes
        .into_iter()
        .filter(|(_, note)| note.user.as_deref() == Some(user))
        .filter(|(_, note)| !approved_only || note.approved)
        .map(|(id, note)| NoteView { id, note })
        .collect())
}

pub async fn get(state: &AppState, id: &str) -> Result<Note, ApiError> {
    let mut notes: NotesDoc = read_doc(state, &state.config.notes_path).await?;
    notes
        .remove(id)
        .ok_or_else(|| ApiError::NotFound(format!("note '{}' not found", id)))
}

/// Flip the approved flag on the note with the given title.
pub async fn approve(state: &AppState, title: &str) -> Result<(), ApiError> {
    let path = state.config.notes_path.clone();
    let message = format!("notehub: approve '{}'", title);
    let mut found = false;
    update_doc::<NotesDoc, _>(state, &path, &message, |notes| {
        // The closure can rerun against fresh content after a conflict.
        found = false;
        for note in notes.values_mut() {
            if note.title.as_deref() == Some(title) {
                note.approved = true;
                found = true;
            }
        }
        found
    })
    .await?;

    if found {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!(
            "no note titled '{}' exists",
            title
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::test_state;

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let state = test_state();
        let id = save(
            &state,
            "alice",
            SaveNote {
                id: Some("x".into()),
                title: Some("T".into()),
                content: "hello".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(id, "x");

        let note = get(&state, "x").await.unwrap();
        assert!(note.content.contains("hello"));
        assert_eq!(note.user.as_deref(), Some("alice"));
        assert!(!note.approved);
    }

    #[tokio::test]
    async fn empty_content_is_a_bad_request() {
        let state = test_state();
        let err = save(&state, "alice", SaveNote::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn missing_id_gets_generated() {
        let state = test_state();
        let id = save(
            &state,
            "alice",
            SaveNote {
                id: None,
                title: None,
                content: "body".into(),
            },
        )
        .await
        .unwrap();
        assert!(!id.is_empty());
        assert!(get(&state, &id).await.is_ok());
    }

    #[tokio::test]
    async fn resaving_keeps_approval_state() {
        let state = test_state();
        save(
            &state,
            "alice",
            SaveNote {
                id: Some("x".into()),
                title: Some("T".into()),
                content: "v1".into(),
            },
        )
        .await
        .unwrap();
        approve(&state, "T").await.unwrap();

        save(
            &state,
            "alice",
            SaveNote {
                id: Some("x".into()),
                title: None,
                content: "v2".into(),
            },
        )
        .await
        .unwrap();

        let note = get(&state, "x").await.unwrap();
        assert_eq!(note.content, "v2");
        assert_eq!(note.title.as_deref(), Some("T"));
        assert!(note.approved);
    }

    #[tokio::test]
    async fn get_unknown_note_is_not_found() {
        let state = test_state();
        let err = get(&state, "missing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn approve_unknown_title_is_not_found() {
        let state = test_state();
        let err = approve(&state, "nope").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn approval_shows_up_in_approved_only_listing() {
        let state = test_state();
        save(
            &state,
            "alice",
            SaveNote {
                id: Some("a".into()),
                title: Some("T".into()),
                content: "one".into(),
            },
        )
        .await
        .unwrap();
        save(
            &state,
            "alice",
            SaveNote {
                id: Some("b".into()),
                title: Some("U".into()),
                content: "two".into(),
            },
        )
        .await
        .unwrap();

        assert!(list(&state, "alice", true).await.unwrap().is_empty());

        approve(&state, "T").await.unwrap();

        let approved = list(&state, "alice", true).await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, "a");

        let all = list(&state, "alice", false).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_caller() {
        let state = test_state();
        save(
            &state,
            "alice",
            SaveNote {
                id: Some("a".into()),
                title: None,
                content: "mine".into(),
            },
        )
        .await
        .unwrap();
        save(
            &state,
            "bob",
            SaveNote {
                id: Some("b".into()),
                title: None,
                content: "theirs".into(),
            },
        )
        .await
        .unwrap();

        let mine = list(&state, "alice", false).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "a");
    }
}
