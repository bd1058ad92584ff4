//! Signed, time-bound session tokens.
//!
//! Replaces the forgeable base64(username:timestamp) cookies of the source
//! variants with HS256 JWTs: `sub` is the username, `exp` is enforced on
//! every verify.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Mint a session token for `username`, expiring after the configured TTL.
    pub fn mint(&self, username: &str) -> Result<String, ApiError> {
        let claims = Claims {
            sub: username.to_string(),
            exp: (Utc::now() + self.ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("failed to sign session token: {}", e)))
    }

    /// Verify a token and return the username it was minted for.
    pub fn verify(&self, token: &str) -> Result<String, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims.sub)
            .map_err(|_| ApiError::Unauthorized("invalid or expired session token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_then_verify_returns_the_username() {
        let keys = SessionKeys::new("a-test-secret-that-is-long", 60);
        let token = keys.mint("alice").unwrap();
        assert_eq!(keys.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::new("a-test-secret-that-is-long", 60);
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let keys = SessionKeys::new("a-test-secret-that-is-long", 60);
        let other = SessionKeys::new("a-different-secret-entirely", 60);
        let token = other.mint("alice").unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = SessionKeys::new("a-test-secret-that-is-long", 60);
        assert!(keys.verify("not-a-token").is_err());
    }
}
