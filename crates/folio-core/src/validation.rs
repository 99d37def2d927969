//! # Validation Module
//!
//! Turns raw operator input into typed values.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Input Validation                                  │
//! │                                                                         │
//! │   Operator types "12" for stock, "9.99" for price                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   parse_stock / parse_price  ← THIS MODULE                              │
//! │        │                                                                │
//! │        ├── Ok(i64 / Money) ──► repository call                          │
//! │        │                                                                │
//! │        └── Err(ValidationError) ──► message shown, nothing changed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check here runs before any state is touched.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{BookChanges, CoverChange, NewBook};
use crate::{MAX_COVER_BYTES, MAX_TEXT_FIELD_LEN};

/// Longest accepted search term.
pub const MAX_SEARCH_TERM_LEN: usize = 100;

/// Most copies a single record (or a single sale) may hold.
pub const MAX_STOCK: i64 = 1_000_000;

/// Highest accepted unit price, in cents (1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Shortest accepted shop password.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Magic bytes at the start of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

// =============================================================================
// Text Fields
// =============================================================================

/// Validates a required free-text field (title, author, publisher, location).
///
/// Returns the trimmed value.
///
/// ## Example
/// ```rust
/// use folio_core::validation::validate_text_field;
///
/// assert_eq!(validate_text_field("title", "  Dune ").unwrap(), "Dune");
/// assert!(validate_text_field("title", "   ").is_err());
/// ```
pub fn validate_text_field(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_TEXT_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_FIELD_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a search term. Empty is allowed and means "no constraint".
pub fn validate_search_term(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_SEARCH_TERM_LEN,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numbers
// =============================================================================

fn parse_positive_count(field: &str, text: &str, max: i64) -> Result<i64, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::required(field));
    }

    let value: i64 = text
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "not a whole number"))?;

    check_count(field, value, max)?;
    Ok(value)
}

fn check_count(field: &str, value: i64, max: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max,
        });
    }
    Ok(())
}

/// Parses a stock level for add and update. Whole number in `1..=MAX_STOCK`.
pub fn parse_stock(text: &str) -> Result<i64, ValidationError> {
    parse_positive_count("stock", text, MAX_STOCK)
}

/// Parses a purchase quantity. Must be a whole number above zero.
///
/// Available stock is checked later by
/// [`quote_purchase`](crate::inventory::quote_purchase).
pub fn parse_quantity(text: &str) -> Result<i64, ValidationError> {
    parse_positive_count("quantity", text, MAX_STOCK)
}

/// Parses a unit price. Must be above zero and at most [`MAX_PRICE_CENTS`].
///
/// ## Example
/// ```rust
/// use folio_core::validation::parse_price;
///
/// assert_eq!(parse_price("12.50").unwrap().cents(), 1250);
/// assert!(parse_price("0").is_err());
/// assert!(parse_price("ten").is_err());
/// ```
pub fn parse_price(text: &str) -> Result<Money, ValidationError> {
    let price = Money::parse(text)?;
    validate_price_cents(price.cents())?;
    Ok(price)
}

/// Checks an already-typed stock value (used by programmatic callers).
pub fn validate_stock(stock: i64) -> Result<(), ValidationError> {
    check_count("stock", stock, MAX_STOCK)
}

/// Checks an already-typed price in cents.
pub fn validate_price_cents(cents: i64) -> Result<(), ValidationError> {
    check_count("price", cents, MAX_PRICE_CENTS)
}

// =============================================================================
// Cover Images
// =============================================================================

/// Checks that the bytes are a PNG of acceptable size.
pub fn validate_cover(bytes: &[u8]) -> Result<(), ValidationError> {
    if bytes.len() > MAX_COVER_BYTES {
        return Err(ValidationError::OutOfRange {
            field: "cover size".to_string(),
            min: 0,
            max: MAX_COVER_BYTES as i64,
        });
    }

    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(ValidationError::invalid_format("cover", "not a PNG image"));
    }

    Ok(())
}

// =============================================================================
// Dates and Passwords
// =============================================================================

/// Rejects reversed date ranges. Equal bounds are fine.
pub fn validate_date_range(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<(), ValidationError> {
    if from > to {
        return Err(ValidationError::InvalidRange {
            field: "report dates".to_string(),
            from: from.to_rfc3339(),
            to: to.to_rfc3339(),
        });
    }
    Ok(())
}

pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Whole Records
// =============================================================================

/// Checks a typed record before it is inserted.
///
/// Text fields are expected to be trimmed already (see [`validate_text_field`]).
pub fn validate_new_book(book: &NewBook) -> Result<(), ValidationError> {
    validate_text_field("title", &book.book_title)?;
    validate_text_field("author", &book.author_name)?;
    validate_text_field("publisher", &book.publisher)?;
    validate_text_field("location", &book.location)?;
    validate_stock(book.stock)?;
    validate_price_cents(book.price_cents)?;
    if let Some(cover) = &book.book_cover {
        validate_cover(cover)?;
    }
    Ok(())
}

/// Checks every field an update would set.
pub fn validate_changes(changes: &BookChanges) -> Result<(), ValidationError> {
    let text_fields = [
        ("title", &changes.book_title),
        ("author", &changes.author_name),
        ("publisher", &changes.publisher),
        ("location", &changes.location),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value {
            validate_text_field(field, value)?;
        }
    }
    if let Some(stock) = changes.stock {
        validate_stock(stock)?;
    }
    if let Some(cents) = changes.price_cents {
        validate_price_cents(cents)?;
    }
    if let CoverChange::Replace(bytes) = &changes.cover {
        validate_cover(bytes)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
