//! The `FileStore` trait seam.
//!
//! Implementations are the real Contents-API store ([`crate::GithubStore`])
//! and an in-process one ([`crate::MemoryStore`]) used by tests and local
//! development. Both speak the same revision-marker protocol.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, StoreError};

/// The outcome of reading one path: the decoded document plus the revision
/// marker required to write it back. A missing file reads as `Value::Null`
/// with no marker; the first write then creates it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: Value,
    pub revision: Option<String>,
}

impl Snapshot {
    /// Snapshot of a path that does not exist yet.
    pub fn missing() -> Self {
        Self {
            document: Value::Null,
            revision: None,
        }
    }

    pub fn exists(&self) -> bool {
        self.revision.is_some()
    }

    /// Decode the document into a typed shape, treating a missing file as
    /// the type's default (empty map, empty list).
    pub fn decode<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        if self.document.is_null() {
            return Ok(T::default());
        }
        serde_json::from_value(self.document.clone()).map_err(|e| StoreError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Read the document at `path` along with its current revision marker.
    /// A path the remote has never seen returns [`Snapshot::missing`].
    async fn read(&self, path: &str) -> Result<Snapshot>;

    /// Write `document` to `path`, proving freshness with `revision` (the
    /// marker from the last read; `None` when creating). Returns the new
    /// revision marker on success.
    async fn write(
        &self,
        path: &str,
        document: &Value,
        revision: Option<&str>,
        message: &str,
    ) -> Result<String>;
}
