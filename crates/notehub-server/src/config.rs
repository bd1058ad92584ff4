//! Environment-resolved configuration.
//!
//! Every secret the source variants hardcoded (store token, OAuth client
//! secret, session key) is injected here at process start and validated
//! once. Variables are prefixed `NOTEHUB_`.

use std::env;

use anyhow::{Context, Result, bail};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_NOTES_PATH: &str = "notes.json";
const DEFAULT_USERS_PATH: &str = "users.json";
const DEFAULT_OAUTH_SCOPE: &str = "read:user";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
const MIN_SESSION_SECRET_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// The real thing: one file per collection in a GitHub repository.
    Github,
    /// In-process store for local development and tests.
    Memory,
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub authorize_url: String,
    pub token_url: String,
    pub user_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub store_mode: StoreMode,
    pub github: Option<GithubConfig>,
    pub oauth: Option<OAuthConfig>,
    pub session: SessionConfig,
    pub notes_path: String,
    pub users_path: String,
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} must be set", name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let store_mode = match optional("NOTEHUB_STORE_MODE").as_deref() {
            None | Some("github") => StoreMode::Github,
            Some("memory") => StoreMode::Memory,
            Some(other) => bail!("NOTEHUB_STORE_MODE must be 'github' or 'memory', got '{other}'"),
        };

        let github = match store_mode {
            StoreMode::Github => Some(GithubConfig {
                token: required("NOTEHUB_GITHUB_TOKEN")?,
                owner: required("NOTEHUB_GITHUB_OWNER")?,
                repo: required("NOTEHUB_GITHUB_REPO")?,
                api_base: optional("NOTEHUB_GITHUB_API_BASE"),
            }),
            StoreMode::Memory => None,
        };

        // OAuth routes stay disabled unless a provider is configured.
        let oauth = match optional("NOTEHUB_OAUTH_CLIENT_ID") {
            Some(client_id) => Some(OAuthConfig {
                authorize_url: required("NOTEHUB_OAUTH_AUTHORIZE_URL")?,
                token_url: required("NOTEHUB_OAUTH_TOKEN_URL")?,
                user_url: required("NOTEHUB_OAUTH_USER_URL")?,
                client_id,
                client_secret: required("NOTEHUB_OAUTH_CLIENT_SECRET")?,
                redirect_uri: required("NOTEHUB_OAUTH_REDIRECT_URI")?,
                scope: optional("NOTEHUB_OAUTH_SCOPE")
                    .unwrap_or_else(|| DEFAULT_OAUTH_SCOPE.to_string()),
            }),
            None => None,
        };

        let session = SessionConfig {
            secret: required("NOTEHUB_SESSION_SECRET")?,
            ttl_minutes: match optional("NOTEHUB_SESSION_TTL_MINUTES") {
                Some(raw) => raw
                    .parse()
                    .context("NOTEHUB_SESSION_TTL_MINUTES must be an integer")?,
                None => DEFAULT_SESSION_TTL_MINUTES,
            },
        };

        let config = Self {
            bind_addr: optional("NOTEHUB_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            store_mode,
            github,
            oauth,
            session,
            notes_path: optional("NOTEHUB_NOTES_PATH")
                .unwrap_or_else(|| DEFAULT_NOTES_PATH.to_string()),
            users_path: optional("NOTEHUB_USERS_PATH")
                .unwrap_or_else(|| DEFAULT_USERS_PATH.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.secret.len() < MIN_SESSION_SECRET_LEN {
            bail!(
                "session secret must be at least {} bytes",
                MIN_SESSION_SECRET_LEN
            );
        }
        if self.session.ttl_minutes <= 0 {
            bail!("session TTL must be positive");
        }
        if self.store_mode == StoreMode::Github && self.github.is_none() {
            bail!("github store selected but no GitHub configuration present");
        }
        if self.notes_path == self.users_path {
            bail!("notes and users must live in different files");
        }
        Ok(())
    }
}
