//! Bounded read-modify-write loop.
//!
//! The source of truth is a shared remote file, so two concurrent writers
//! race: the slower one's revision marker goes stale and its write fails
//! with a conflict. Instead of dropping that update on the floor, `update`
//! re-reads, re-applies the mutation to the fresh document, and writes
//! again, up to a fixed attempt budget. Transport failures get the same
//! budget with a short backoff.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::store::FileStore;

const MAX_UPDATE_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF_MS: u64 = 200;

/// Read `path`, retrying transport failures with the same budget the write
/// path gets.
pub async fn read_retrying(store: &dyn FileStore, path: &str) -> Result<crate::store::Snapshot> {
    let mut last_err: Option<StoreError> = None;
    for attempt in 1..=MAX_UPDATE_ATTEMPTS {
        match store.read(path).await {
            Ok(snapshot) => return Ok(snapshot),
            Err(e) if e.is_remote_unavailable() && attempt < MAX_UPDATE_ATTEMPTS => {
                warn!("read {} failed ({}), retrying", path, e);
                tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err
        .unwrap_or_else(|| StoreError::RemoteUnavailable("read attempt budget was zero".into())))
}

/// Read `path`, apply `mutate` to the document, and write the result back
/// with the revision marker from that read. Returns the new marker, or
/// `None` when `mutate` declines to produce a document (nothing written).
pub async fn update<F>(
    store: &dyn FileStore,
    path: &str,
    message: &str,
    mutate: F,
) -> Result<Option<String>>
where
    F: FnMut(Value) -> Option<Value>,
{
    update_with_attempts(store, path, message, MAX_UPDATE_ATTEMPTS, mutate).await
}

pub async fn update_with_attempts<F>(
    store: &dyn FileStore,
    path: &str,
    message: &str,
    attempts: u32,
    mut mutate: F,
) -> Result<Option<String>>
where
    F: FnMut(Value) -> Option<Value>,
{
    let mut last_err: Option<StoreError> = None;

    for attempt in 1..=attempts {
        let snapshot = match store.read(path).await {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_remote_unavailable() && attempt < attempts => {
                warn!("read {} failed ({}), retrying", path, e);
                tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;
                last_err = Some(e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let Some(next) = mutate(snapshot.document) else {
            return Ok(None);
        };

        match store
            .write(path, &next, snapshot.revision.as_deref(), message)
            .await
        {
            Ok(revision) => return Ok(Some(revision)),
            Err(e) if e.is_conflict() && attempt < attempts => {
                debug!("revision conflict on {} (attempt {}), re-reading", path, attempt);
                last_err = Some(e);
            }
            Err(e) if e.is_remote_unavailable() && attempt < attempts => {
                warn!("write {} failed ({}), retrying", path, e);
                tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err
        .unwrap_or_else(|| StoreError::RemoteUnavailable("update attempt budget was zero".into())))
}
