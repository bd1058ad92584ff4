//! Store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure or a 5xx from the remote store.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The revision marker supplied with a write no longer matches the
    /// remote content. Retryable: re-read, re-apply, write again.
    #[error("revision conflict on '{path}'")]
    Conflict { path: String },

    /// Stored content is not valid base64-encoded JSON.
    #[error("malformed stored content at '{path}': {reason}")]
    Decode { path: String, reason: String },
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, StoreError::RemoteUnavailable(_))
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
