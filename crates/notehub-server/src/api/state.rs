use std::sync::Arc;

use anyhow::{Result, bail};
use notehub_store::{FileStore, GithubStore, GithubStoreConfig, MemoryStore};

use crate::auth::{OAuthClient, SessionKeys};
use crate::config::{Config, StoreMode};

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FileStore>,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionKeys>,
    pub oauth: Option<Arc<OAuthClient>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn FileStore> = match config.store_mode {
            StoreMode::Github => {
                let Some(github) = config.github.clone() else {
                    bail!("github store selected but no GitHub configuration present");
                };
                Arc::new(GithubStore::new(GithubStoreConfig {
                    token: github.token,
                    owner: github.owner,
                    repo: github.repo,
                    api_base: github.api_base,
                }))
            }
            StoreMode::Memory => Arc::new(MemoryStore::new()),
        };

        let sessions = Arc::new(SessionKeys::new(
            &config.session.secret,
            config.session.ttl_minutes,
        ));
        let oauth = config
            .oauth
            .clone()
            .map(|oauth| Arc::new(OAuthClient::new(oauth)));

        Ok(Self {
            store,
            config: Arc::new(config),
            sessions,
            oauth,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::config::SessionConfig;

    let config = Config {
        bind_addr: "127.0.0.1:0".to_string(),
        store_mode: StoreMode::Memory,
        github: None,
        oauth: None,
        session: SessionConfig {
            secret: "a-test-secret-that-is-long".to_string(),
            ttl_minutes: 60,
        },
        notes_path: "notes.json".to_string(),
        users_path: "users.json".to_string(),
    };
    AppState::new(config).expect("test state")
}
