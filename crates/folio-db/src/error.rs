//! # Database Errors
//!
//! ```text
//! sqlx::Error ──┬── CHECK / NOT NULL / UNIQUE ──► Constraint
//!               ├── "database is locked", pool timeout ──► Busy
//!               └── anything else ──► Sql
//! MigrateError ───► Migration
//! CoreError ──────► Rule    (raised inside a transaction, before any write)
//! ```
//!
//! The front end shows `Rule` errors as they are and logs the rest.

use folio_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened or created.
    #[error("Cannot open database: {0}")]
    Open(String),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    /// Another `folio` process held the write lock past the busy timeout.
    #[error("Database is busy")]
    Busy,

    /// The schema rejected a row (e.g. the `stock >= 0` CHECK).
    #[error("Rejected by schema: {0}")]
    Constraint(String),

    #[error("SQL error: {0}")]
    Sql(String),

    /// A bookshop rule stopped the operation; nothing was written.
    #[error(transparent)]
    Rule(#[from] CoreError),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation => DbError::Constraint(db_err.message().to_string()),
                _ if db_err.message().contains("database is locked") => DbError::Busy,
                _ => DbError::Sql(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::Open("connection pool is closed".to_string()),
            other => DbError::Sql(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
