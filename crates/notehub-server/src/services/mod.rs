//! Business logic over the document store.
//!
//! Handlers stay thin; these functions own the read-modify-write cycles.

pub mod notes;
pub mod users;

use notehub_store::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::AppState;
use crate::error::ApiError;

/// Read and decode one document, treating a missing file as empty.
pub(crate) async fn read_doc<T>(state: &AppState, path: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    let snapshot = notehub_store::read_retrying(state.store.as_ref(), path).await?;
    Ok(snapshot.decode(path)?)
}

/// Run a typed mutation through the store's bounded read-modify-write loop.
///
/// `mutate` returns `true` to write the changed document, `false` to leave
/// the remote untouched (for example, a duplicate registration). It may run
/// more than once when a concurrent writer forces a re-read, so it must not
/// assume the first document it saw is the one it ends up changing.
pub(crate) async fn update_doc<T, F>(
    state: &AppState,
    path: &str,
    message: &str,
    mut mutate: F,
) -> Result<(), ApiError>
where
    T: DeserializeOwned + Serialize + Default,
    F: FnMut(&mut T) -> bool,
{
    let mut failure: Option<ApiError> = None;
    notehub_store::update(state.store.as_ref(), path, message, |document| {
        let mut typed: T = match decode_value(document, path) {
            Ok(typed) => typed,
            Err(e) => {
                failure = Some(e);
                return None;
            }
        };
        if !mutate(&mut typed) {
            return None;
        }
        match serde_json::to_value(&typed) {
            Ok(value) => Some(value),
            Err(e) => {
                failure = Some(ApiError::Internal(format!(
                    "failed to re-encode '{}': {}",
                    path, e
                )));
                None
            }
        }
    })
    .await?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn decode_value<T>(document: Value, path: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if document.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(document).map_err(|e| {
        ApiError::from(StoreError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    })
}
