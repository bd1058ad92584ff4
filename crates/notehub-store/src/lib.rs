//! Remote-file-backed JSON document store.
//!
//! One file in a GitHub repository acts as a mutable JSON document reached
//! over the Contents API. Every write carries the revision marker (sha)
//! obtained from the preceding read of the same path; the remote rejects
//! stale markers, which surfaces here as [`StoreError::Conflict`].

pub mod error;
pub mod github;
pub mod memory;
pub mod retry;
pub mod store;

pub use error::{Result, StoreError};
pub use github::{GithubStore, GithubStoreConfig};
pub use memory::MemoryStore;
pub use retry::{read_retrying, update};
pub use store::{FileStore, Snapshot};
