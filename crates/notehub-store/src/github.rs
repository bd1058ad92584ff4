//! GitHub Contents-API implementation of [`FileStore`].
//!
//! `GET /repos/{owner}/{repo}/contents/{path}` returns `{content: base64,
//! sha}`; `PUT` takes `{message, content: base64, sha?}` and rejects a stale
//! or missing sha on an existing file, which we surface as
//! [`StoreError::Conflict`].

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::store::{FileStore, Snapshot};

const DEFAULT_API_BASE: &str = "https://api.github.com";
/// The Contents API rejects requests without a User-Agent.
const USER_AGENT: &str = "notehub";
const ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct GithubStoreConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    /// Override for GitHub Enterprise; defaults to api.github.com.
    pub api_base: Option<String>,
}

pub struct GithubStore {
    client: Client,
    config: GithubStoreConfig,
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Deserialize)]
struct PutContent {
    sha: String,
}

impl GithubStore {
    pub fn new(config: GithubStoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn contents_url(&self, path: &str) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!(
            "{}/repos/{}/{}/contents/{}",
            base, self.config.owner, self.config.repo, path
        )
    }
}

/// Decode a Contents-API body (base64 with embedded newlines) into JSON.
fn decode_content(path: &str, raw: &str) -> Result<Value> {
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| StoreError::Decode {
        path: path.to_string(),
        reason: format!("invalid base64: {}", e),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode {
        path: path.to_string(),
        reason: format!("invalid JSON: {}", e),
    })
}

fn encode_content(document: &Value) -> String {
    STANDARD.encode(document.to_string())
}

#[async_trait]
impl FileStore for GithubStore {
    async fn read(&self, path: &str) -> Result<Snapshot> {
        let url = self.contents_url(path);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                debug!("{} not present in remote store", path);
                Ok(Snapshot::missing())
            }
            status if status.is_success() => {
                let body: ContentsResponse = resp.json().await.map_err(|e| StoreError::Decode {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;
                let document = decode_content(path, &body.content)?;
                Ok(Snapshot {
                    document,
                    revision: Some(body.sha),
                })
            }
            status => Err(StoreError::RemoteUnavailable(format!(
                "GET {} returned {}",
                path, status
            ))),
        }
    }

    async fn write(
        &self,
        path: &str,
        document: &Value,
        revision: Option<&str>,
        message: &str,
    ) -> Result<String> {
        let url = self.contents_url(path);
        let body = PutRequest {
            message,
            content: encode_content(document),
            sha: revision,
        };
        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.config.token)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::RemoteUnavailable(e.to_string()))?;

        match resp.status() {
            // 409 and 422 are how the Contents API reports a sha mismatch.
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                warn!("stale revision marker writing {}", path);
                Err(StoreError::Conflict {
                    path: path.to_string(),
                })
            }
            status if status.is_success() => {
                let body: PutResponse = resp.json().await.map_err(|e| StoreError::Decode {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(body.content.sha)
            }
            status => Err(StoreError::RemoteUnavailable(format!(
                "PUT {} returned {}",
                path, status
            ))),
        }
    }
}
