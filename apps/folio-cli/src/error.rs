//! # CLI Error Type
//!
//! Unified error type for every `folio` command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Folio                                  │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, AppError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Database Error? ─── DbError::Sql("...") ──┐                   │
//! │         │                                          │                   │
//! │         ▼                                          ▼                   │
//! │  Rule / Validation? ── CoreError::InsufficientStock ── AppError        │
//! │         │                                              │               │
//! │         ▼                                              ▼               │
//! │  Export I/O? ── io / csv / lopdf ─────────────────► stderr + exit code │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details (SQL text, file system paths of the database) are logged
//! with `tracing::error!` and replaced with a generic message.

use std::process::ExitCode;

use folio_core::{CoreError, ValidationError};
use folio_db::DbError;
use serde::Serialize;

/// Error returned by every command.
///
/// ## Serialization
/// With `--json` this is printed to stdout as:
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Dune: 2 available, 3 requested"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, one per kind of failure the operator can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Serial number does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Purchase larger than the stock on hand
    InsufficientStock,

    /// Wrong shop password
    AuthFailed,

    /// Report file could not be written
    Export,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for this kind of failure.
    pub const fn exit_status(self) -> u8 {
        match self {
            ErrorCode::ValidationError | ErrorCode::NotFound | ErrorCode::InsufficientStock => 2,
            ErrorCode::AuthFailed => 3,
            ErrorCode::DatabaseError => 4,
            ErrorCode::Export => 5,
            ErrorCode::Internal => 1,
        }
    }
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_status())
    }
}

/// Converts database errors to CLI errors.
///
/// Rule errors keep their message; everything else is logged in full and
/// shown as a short generic line.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        let message = match err {
            DbError::Rule(e) => return AppError::from(e),
            DbError::Constraint(detail) => {
                tracing::error!(%detail, "Row rejected by schema");
                return AppError::validation("Stock and price must stay positive");
            }
            DbError::Busy => {
                tracing::warn!("Database busy");
                "Database is busy, another folio may be running; try again"
            }
            DbError::Open(detail) => {
                tracing::error!(%detail, "Database open failed");
                "Could not open the database"
            }
            DbError::Migration(detail) => {
                tracing::error!(%detail, "Database migration failed");
                "Database migration failed"
            }
            DbError::Sql(detail) => {
                tracing::error!(%detail, "Database query failed");
                "Database operation failed"
            }
        };

        AppError::new(ErrorCode::DatabaseError, message)
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BookNotFound(serial) => AppError::not_found("Book", &serial.to_string()),
            CoreError::InsufficientStock {
                title,
                available,
                requested,
            } => AppError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    title, available, requested
                ),
            ),
            CoreError::UnknownTransactionType(code) => {
                tracing::error!(code, "Unknown transaction type in reports table");
                AppError::internal(format!("Unknown transaction type code {}", code))
            }
            CoreError::QueryOnlyTransactionType => {
                AppError::internal("Transaction type ALL cannot be recorded")
            }
            CoreError::InvalidCredentials => AppError::new(ErrorCode::AuthFailed, "Login failed"),
            CoreError::PasswordHash(e) => {
                tracing::error!("Password hashing failed: {}", e);
                AppError::new(ErrorCode::AuthFailed, "Stored credential is unreadable")
            }
            CoreError::Validation(e) => AppError::from(e),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {}", err);
        AppError::new(ErrorCode::Export, format!("Could not write file: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        tracing::error!("CSV export failed: {}", err);
        AppError::new(ErrorCode::Export, format!("CSV export failed: {}", err))
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        tracing::error!("PDF export failed: {}", err);
        AppError::new(ErrorCode::Export, format!("PDF export failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("Could not encode output: {}", err))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
