//! In-process [`FileStore`] with the same revision-marker protocol as the
//! remote store. Backs the test suite and the `memory` store mode for local
//! development without a GitHub repository.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::store::{FileStore, Snapshot};

#[derive(Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<String, (Value, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_revision() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Snapshot> {
        let files = self.files.read().expect("memory store lock");
        match files.get(path) {
            Some((document, revision)) => Ok(Snapshot {
                document: document.clone(),
                revision: Some(revision.clone()),
            }),
            None => Ok(Snapshot::missing()),
        }
    }

    async fn write(
        &self,
        path: &str,
        document: &Value,
        revision: Option<&str>,
        _message: &str,
    ) -> Result<String> {
        let mut files = self.files.write().expect("memory store lock");
        let current = files.get(path).map(|(_, rev)| rev.as_str());
        if current != revision {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }
        let next = Self::fresh_revision();
        files.insert(path.to_string(), (document.clone(), next.clone()));
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_path_reads_as_empty_document() {
        let store = MemoryStore::new();
        let snapshot = store.read("notes.json").await.unwrap();
        assert!(!snapshot.exists());
        assert!(snapshot.document.is_null());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let store = MemoryStore::new();
        let doc = json!({"x": {"content": "hello"}});
        let rev = store.write("notes.json", &doc, None, "create").await.unwrap();

        let snapshot = store.read("notes.json").await.unwrap();
        assert_eq!(snapshot.document, doc);
        assert_eq!(snapshot.revision.as_deref(), Some(rev.as_str()));
    }

    #[tokio::test]
    async fn stale_revision_is_rejected_without_clobbering() {
        let store = MemoryStore::new();
        let first = store
            .write("notes.json", &json!({"v": 1}), None, "create")
            .await
            .unwrap();
        store
            .write("notes.json", &json!({"v": 2}), Some(&first), "update")
            .await
            .unwrap();

        // A writer still holding the first revision must fail.
        let err = store
            .write("notes.json", &json!({"v": 99}), Some(&first), "stale")
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let snapshot = store.read("notes.json").await.unwrap();
        assert_eq!(snapshot.document, json!({"v": 2}));
    }

    #[tokio::test]
    async fn creating_an_existing_path_conflicts() {
        let store = MemoryStore::new();
        store
            .write("notes.json", &json!({}), None, "create")
            .await
            .unwrap();
        let err = store
            .write("notes.json", &json!({}), None, "create again")
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn typed_decode_defaults_on_missing_file() {
        let store = MemoryStore::new();
        let snapshot = store.read("users.json").await.unwrap();
        let users: std::collections::BTreeMap<String, Value> =
            snapshot.decode("users.json").unwrap();
        assert!(users.is_empty());
    }
}
