//! Parametrized OAuth provider client.
//!
//! One client covers every provider the source variants copied around
//! (GitHub, Google, Discord): authorize/token/user-info endpoints come from
//! configuration. Bearer tokens are validated the only way an opaque token
//! can be: by forwarding to the provider's "current user" endpoint.

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::OAuthConfig;
use crate::error::ApiError;

const USER_AGENT: &str = "notehub";

/// Profile returned by a provider's user-info endpoint. Field names differ
/// per provider (`login` on GitHub, `email` on Google, `username` on
/// Discord), so all are optional and [`ProviderUser::identifier`] picks the
/// first present.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ProviderUser {
    pub fn identifier(&self) -> Option<&str> {
        self.login
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .or(self.name.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct OAuthClient {
    client: Client,
    config: OAuthConfig,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// The URL `GET /login` redirects to.
    pub fn authorize_url(&self) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.config.authorize_url)
            .map_err(|e| ApiError::Internal(format!("bad authorize URL in config: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope)
            .append_pair("response_type", "code");
        Ok(url.into())
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, ApiError> {
        let resp = self
            .client
            .post(&self.config.token_url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| ApiError::RemoteUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ApiError::Unauthorized(format!(
                "token exchange failed with {}",
                resp.status()
            )));
        }

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("token response: {}", e)))?;

        if let Some(error) = body.error {
            return Err(ApiError::Unauthorized(format!(
                "provider rejected the code: {}",
                error
            )));
        }
        body.access_token
            .ok_or_else(|| ApiError::Decode("token response missing access_token".to_string()))
    }

    /// Validate a bearer token by asking the provider who it belongs to.
    pub async fn fetch_user(&self, bearer: &str) -> Result<ProviderUser, ApiError> {
        let resp = self
            .client
            .get(&self.config.user_url)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| ApiError::RemoteUnavailable(e.to_string()))?;

        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ApiError::Unauthorized(
                "bearer token rejected by provider".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ApiError::RemoteUnavailable(format!(
                "user-info endpoint returned {}",
                status
            )));
        }

        resp.json()
            .await
            .map_err(|e| ApiError::Decode(format!("provider profile: {}", e)))
    }
}
