//! Account registration and credential login.

use chrono::Utc;

use crate::api::AppState;
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::models::{UserRecord, UsersDoc};
use crate::services::{read_doc, update_doc};

pub async fn register(state: &AppState, username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    let path = state.config.users_path.clone();
    let message = format!("notehub: register {}", username);
    let mut duplicate = false;
    update_doc::<UsersDoc, _>(state, &path, &message, |users| {
        duplicate = users.contains_key(username);
        if duplicate {
            return false;
        }
        users.insert(
            username.to_string(),
            UserRecord {
                password_hash: hash_password(password),
                approved: false,
                created_at: Some(Utc::now()),
            },
        );
        true
    })
    .await?;

    if duplicate {
        return Err(ApiError::Conflict(format!(
            "username '{}' is already registered",
            username
        )));
    }
    Ok(())
}

/// Check a username/password pair and mint a session token.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<String, ApiError> {
    let users: UsersDoc = read_doc(state, &state.config.users_path).await?;

    // One message for both failure modes; don't leak which half was wrong.
    let rejected = || ApiError::Unauthorized("unknown username or wrong password".to_string());

    let record = users.get(username).ok_or_else(rejected)?;
    if !verify_password(password, &record.password_hash) {
        return Err(rejected());
    }
    state.sessions.mint(username)
}
