//! # Errors
//!
//! ```text
//! ValidationError   bad operator input, caught before anything is read
//!        │
//!        ▼
//! CoreError         bookshop rule broken (stock, login, type codes)
//!        │
//!        ▼
//! DbError::Rule     (folio-db)  ──►  AppError  (folio-cli)
//! ```
//!
//! Both types render straight to the operator, so their messages are
//! written as sentences a shop assistant can act on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Book not found: {0}")]
    BookNotFound(i64),

    /// Purchase asks for more copies than are on the shelf. Nothing is
    /// written when this is raised.
    ///
    /// ```text
    /// folio buy 12 3   (shelf has 2)
    ///      ──► InsufficientStock { title: "Dune", available: 2, requested: 3 }
    /// ```
    #[error("Insufficient stock for '{title}': available {available}, requested {requested}")]
    InsufficientStock {
        title: String,
        available: i64,
        requested: i64,
    },

    /// A `reports.transaction_type` value outside 0..=4.
    #[error("Unknown transaction type code: {0}")]
    UnknownTransactionType(i32),

    /// `All` only makes sense in a query; a report row needs a real kind.
    #[error("Transaction type ALL is query-only and cannot be recorded")]
    QueryOnlyTransactionType,

    #[error("Login failed")]
    InvalidCredentials,

    /// Argon2 rejected its input, or the stored hash is not a PHC string.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Operator input that cannot be accepted. `field` is the name the
/// operator typed it under ("title", "price", "quantity", ...).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Not a number, not a date, not a PNG, too many decimals.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be one of {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Report range given backwards.
    #[error("{field}: start {from} is after end {to}")]
    InvalidRange {
        field: String,
        from: String,
        to: String,
    },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
