//! # Credential Repository
//!
//! Stores the shop password hash (single row, `id = 1`). Hashing and
//! verification live in `folio_core::auth`; this module never sees a
//! plaintext password.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use folio_core::types::record_time;

#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: SqlitePool,
}

impl CredentialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CredentialRepository { pool }
    }

    /// The stored PHC hash, or `None` before the first login.
    pub async fn password_hash(&self) -> DbResult<Option<String>> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM credentials WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(hash)
    }

    /// Replaces the stored hash.
    pub async fn store_hash(&self, password_hash: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, password_hash, updated_at)
            VALUES (1, ?1, ?2)
            ON CONFLICT (id) DO UPDATE SET
                password_hash = excluded.password_hash,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(password_hash)
        .bind(record_time(Utc::now()))
        .execute(&self.pool)
        .await?;

        info!("Shop password updated");
        Ok(())
    }

    /// Stores `password_hash` only if no credential exists yet.
    ///
    /// Returns true when the hash was written.
    pub async fn store_if_missing(&self, password_hash: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO credentials (id, password_hash, updated_at)
            VALUES (1, ?1, ?2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(password_hash)
        .bind(record_time(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_store_and_replace() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let creds = db.credentials();

        assert_eq!(creds.password_hash().await.unwrap(), None);

        assert!(creds.store_if_missing("hash-one").await.unwrap());
        assert!(!creds.store_if_missing("hash-two").await.unwrap());
        assert_eq!(creds.password_hash().await.unwrap().as_deref(), Some("hash-one"));

        creds.store_hash("hash-three").await.unwrap();
        assert_eq!(creds.password_hash().await.unwrap().as_deref(), Some("hash-three"));
    }
}
