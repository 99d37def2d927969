//! # Login Gate
//!
//! Every command runs behind the shop password.
//!
//! ```text
//! password from --password / FOLIO_PASSWORD / stdin prompt
//!      │
//!      ▼
//! credentials table empty? ──yes──► store hash of the default password
//!      │
//!      ▼
//! argon2 verify ── mismatch ──► "Login failed", exit code 3
//!      │
//!      ▼
//! command runs
//! ```

use std::io::{BufRead, Write};

use folio_core::auth::{hash_password, verify_password};
use folio_core::validation::validate_new_password;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct SessionMessage {
    pub message: String,
}

/// Checks `password` against the stored credential.
///
/// On first run the configured default password is stored before checking.
pub async fn authenticate(state: &AppState, password: &str) -> Result<(), AppError> {
    let credentials = state.db().credentials();

    let stored = match credentials.password_hash().await? {
        Some(hash) => hash,
        None => {
            let hash = hash_password(&state.config().default_password)?;
            if credentials.store_if_missing(&hash).await? {
                info!("Stored initial shop password");
            }
            credentials
                .password_hash()
                .await?
                .ok_or_else(|| AppError::internal("Shop credential missing after setup"))?
        }
    };

    verify_password(password, &stored).map_err(|e| {
        warn!("Login failed");
        AppError::from(e)
    })
}

pub fn login() -> SessionMessage {
    SessionMessage {
        message: "Login successful".to_string(),
    }
}

/// Replaces the shop password. The caller has already passed the gate.
pub async fn change_password(state: &AppState, new_password: &str) -> Result<SessionMessage, AppError> {
    validate_new_password(new_password)?;
    let hash = hash_password(new_password)?;
    state.db().credentials().store_hash(&hash).await?;

    Ok(SessionMessage {
        message: "Password changed".to_string(),
    })
}

/// Asks for the password on `prompt` and reads one line from `input`.
pub fn prompt_password<R: BufRead, W: Write>(mut input: R, mut prompt: W) -> Result<String, AppError> {
    write!(prompt, "Password: ")?;
    prompt.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        return Err(AppError::validation("password is required"));
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppConfig;
    use folio_db::{Database, DbConfig};
    use std::io::Cursor;

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, AppConfig::default())
    }

    #[tokio::test]
    async fn test_first_login_uses_default_password() {
        let state = test_state().await;

        authenticate(&state, "scope").await.unwrap();
        assert!(state.db().credentials().password_hash().await.unwrap().is_some());

        let err = authenticate(&state, "wrong").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);
        assert_eq!(err.message, "Login failed");
    }

    #[tokio::test]
    async fn test_wrong_password_on_first_run_still_fails() {
        let state = test_state().await;
        let err = authenticate(&state, "nope").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);
    }

    #[tokio::test]
    async fn test_change_password() {
        let state = test_state().await;
        authenticate(&state, "scope").await.unwrap();

        let err = change_password(&state, "abc").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        change_password(&state, "hunter22").await.unwrap();
        authenticate(&state, "hunter22").await.unwrap();
        assert!(authenticate(&state, "scope").await.is_err());
    }

    #[test]
    fn test_prompt_password_reads_one_line() {
        let mut prompt = Vec::new();
        let password = prompt_password(Cursor::new("s3cret word\r\nignored\n"), &mut prompt).unwrap();
        assert_eq!(password, "s3cret word");
        assert_eq!(prompt, b"Password: ");

        let err = prompt_password(Cursor::new(""), Vec::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
