//! # Book Commands
//!
//! Inventory record maintenance: add, search, list, show, update, delete and
//! the low-stock listing.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Book Search Flow                                     │
//! │                                                                         │
//! │  folio search --title "dune" --author "herbert"                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_search_term (length only, empty allowed)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                          │
//! │  │  Both terms empty?                        │                          │
//! │  │  YES: every record (up to the limit)      │                          │
//! │  │  NO:  FTS5 prefix match on title/author   │                          │
//! │  └───────────────────────────────────────────┘                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BookList ordered by relevance                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use folio_core::inventory::stock_delta;
use folio_core::validation::{
    parse_price, parse_stock, validate_cover, validate_search_term, validate_text_field,
};
use folio_core::{Book, BookChanges, CoverChange, LowStockAlert, NewBook, ValidationError};
use serde::Serialize;
use tracing::{debug, info};

use super::low_stock_alert;
use super::report::{parse_date_bound, DayBound};
use crate::cli::{AddArgs, SearchArgs, UpdateArgs};
use crate::error::AppError;
use crate::state::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// Book DTO for output.
///
/// The cover image itself is never printed; `has_cover` says whether one
/// is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDto {
    pub serial_number: i64,
    pub book_title: String,
    pub author_name: String,
    pub publisher: String,
    pub date_time: DateTime<Utc>,
    pub stock: i64,
    /// Decimal price, e.g. "9.99"
    pub price: String,
    pub price_cents: i64,
    pub location: String,
    pub has_cover: bool,
    pub low_stock: bool,
}

impl From<Book> for BookDto {
    fn from(b: Book) -> Self {
        BookDto {
            serial_number: b.serial_number,
            price: b.price().to_string(),
            price_cents: b.price_cents,
            has_cover: b.has_cover(),
            low_stock: b.is_low_stock(),
            stock: b.stock,
            date_time: b.date_time,
            book_title: b.book_title,
            author_name: b.author_name,
            publisher: b.publisher,
            location: b.location,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookList {
    pub books: Vec<BookDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddResult {
    pub book: BookDto,
    pub low_stock: Option<LowStockAlert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateResult {
    pub before: BookDto,
    pub after: BookDto,
    /// Units recorded in the UPDATES report row
    pub stock_delta: i64,
    pub low_stock: Option<LowStockAlert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub removed: BookDto,
    pub low_stock: Option<LowStockAlert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LowStockReport {
    pub alert: Option<LowStockAlert>,
}

// =============================================================================
// Commands
// =============================================================================

/// Adds a record. Every field is validated before anything is written.
pub async fn add(state: &AppState, args: &AddArgs) -> Result<AddResult, AppError> {
    let date_time = match &args.date {
        Some(text) => parse_date_bound("date", text, DayBound::Start)?,
        None => Utc::now(),
    };

    let new_book = NewBook {
        book_title: validate_text_field("title", &args.title)?,
        author_name: validate_text_field("author", &args.author)?,
        publisher: validate_text_field("publisher", &args.publisher)?,
        location: validate_text_field("location", &args.location)?,
        stock: parse_stock(&args.stock)?,
        price_cents: parse_price(&args.price)?.cents(),
        date_time,
        book_cover: args.cover.as_deref().map(read_cover).transpose()?,
    };

    debug!(title = %new_book.book_title, "add command");
    let book = state.db().books().insert(&new_book).await?;

    Ok(AddResult {
        book: BookDto::from(book),
        low_stock: low_stock_alert(state.db()).await?,
    })
}

/// Full-text search on title and author.
pub async fn search(state: &AppState, args: &SearchArgs) -> Result<BookList, AppError> {
    let start = Instant::now();
    let title = validate_search_term("title", &args.title)?;
    let author = validate_search_term("author", &args.author)?;
    let limit = state.config().limit(args.limit);

    let books = state.db().books().search(&title, &author, limit).await?;
    let books: Vec<BookDto> = books.into_iter().map(BookDto::from).collect();

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = books.len(),
        title = %title,
        author = %author,
        "search complete"
    );
    Ok(BookList { books })
}

pub async fn list(state: &AppState) -> Result<BookList, AppError> {
    let books = state.db().books().list_all().await?;
    Ok(BookList {
        books: books.into_iter().map(BookDto::from).collect(),
    })
}

pub async fn show(state: &AppState, serial: i64) -> Result<BookDto, AppError> {
    debug!(serial, "show command");
    let book = state
        .db()
        .books()
        .get(serial)
        .await?
        .ok_or_else(|| AppError::not_found("Book", &serial.to_string()))?;
    Ok(BookDto::from(book))
}

/// Changes the given fields. At least one field must be given.
pub async fn update(state: &AppState, args: &UpdateArgs) -> Result<UpdateResult, AppError> {
    let changes = changes_from_args(args)?;
    if changes.is_empty() {
        return Err(AppError::validation("Nothing to update: give at least one field"));
    }

    let (before, after) = state.db().books().update(args.serial, &changes).await?;
    let delta = stock_delta(before.stock, after.stock);

    Ok(UpdateResult {
        before: BookDto::from(before),
        after: BookDto::from(after),
        stock_delta: delta,
        low_stock: low_stock_alert(state.db()).await?,
    })
}

pub async fn delete(state: &AppState, serial: i64) -> Result<DeleteResult, AppError> {
    let removed = state.db().books().delete(serial).await?;
    Ok(DeleteResult {
        removed: BookDto::from(removed),
        low_stock: low_stock_alert(state.db()).await?,
    })
}

pub async fn low_stock(state: &AppState) -> Result<LowStockReport, AppError> {
    Ok(LowStockReport {
        alert: low_stock_alert(state.db()).await?,
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn changes_from_args(args: &UpdateArgs) -> Result<BookChanges, AppError> {
    let text = |field: &str, value: &Option<String>| -> Result<Option<String>, ValidationError> {
        value
            .as_deref()
            .map(|v| validate_text_field(field, v))
            .transpose()
    };

    let cover = match (&args.cover, args.clear_cover) {
        (Some(path), _) => CoverChange::Replace(read_cover(path)?),
        (None, true) => CoverChange::Remove,
        (None, false) => CoverChange::Keep,
    };

    Ok(BookChanges {
        book_title: text("title", &args.title)?,
        author_name: text("author", &args.author)?,
        publisher: text("publisher", &args.publisher)?,
        location: text("location", &args.location)?,
        stock: args.stock.as_deref().map(parse_stock).transpose()?,
        price_cents: args
            .price
            .as_deref()
            .map(|p| parse_price(p).map(|m| m.cents()))
            .transpose()?,
        cover,
    })
}

/// Loads and checks a PNG cover image.
pub(crate) fn read_cover(path: &Path) -> Result<Vec<u8>, AppError> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::validation(format!(
            "Could not read cover image {}: {}",
            path.display(),
            e
        ))
    })?;
    validate_cover(&bytes)?;
    Ok(bytes)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppConfig;
    use folio_core::validation::PNG_SIGNATURE;
    use folio_core::TransactionType;
    use folio_db::{Database, DbConfig};

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, AppConfig::default())
    }

    fn add_args(title: &str, stock: &str, price: &str) -> AddArgs {
        AddArgs {
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            publisher: "Chilton Books".to_string(),
            location: "Shelf A".to_string(),
            stock: stock.to_string(),
            price: price.to_string(),
            date: None,
            cover: None,
        }
    }

    #[tokio::test]
    async fn test_add_reports_low_stock_only_below_five() {
        let state = test_state().await;

        let five = add(&state, &add_args("Dune", "5", "9.99")).await.unwrap();
        assert_eq!(five.book.price_cents, 999);
        assert!(!five.book.low_stock);
        assert!(five.low_stock.is_none());

        let four = add(&state, &add_args("Dune Messiah", "4", "9.99")).await.unwrap();
        let alert = four.low_stock.unwrap();
        assert_eq!(alert.books.len(), 1);
        assert_eq!(alert.books[0].book_title, "Dune Messiah");
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input_without_writing() {
        let state = test_state().await;

        for (stock, price) in [("", "9.99"), ("ten", "9.99"), ("-1", "9.99"), ("3", "0"), ("3", "abc")] {
            let err = add(&state, &add_args("Dune", stock, price)).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "stock={stock} price={price}");
        }

        let err = add(&state, &add_args("   ", "3", "9.99")).await.unwrap_err();
        assert_eq!(err.message, "title is required");

        assert_eq!(state.db().books().count().await.unwrap(), 0);
        assert_eq!(state.db().reports().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_with_date_and_cover() {
        let state = test_state().await;
        let dir = tempfile::tempdir().unwrap();
        let cover_path = dir.path().join("cover.png");
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(&[0, 0, 0, 0]);
        std::fs::write(&cover_path, &png).unwrap();

        let mut args = add_args("Dune", "6", "12.50");
        args.date = Some("2024-03-05T10:00:00Z".to_string());
        args.cover = Some(cover_path);

        let added = add(&state, &args).await.unwrap();
        assert!(added.book.has_cover);
        assert_eq!(added.book.date_time.to_rfc3339(), "2024-03-05T10:00:00+00:00");

        let stored = state.db().books().get(added.book.serial_number).await.unwrap().unwrap();
        assert_eq!(stored.book_cover, Some(png));
    }

    #[tokio::test]
    async fn test_add_rejects_non_png_cover() {
        let state = test_state().await;
        let dir = tempfile::tempdir().unwrap();
        let cover_path = dir.path().join("cover.jpg");
        std::fs::write(&cover_path, b"\xFF\xD8\xFF\xE0 jpeg").unwrap();

        let mut args = add_args("Dune", "6", "12.50");
        args.cover = Some(cover_path);

        let err = add(&state, &args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(state.db().books().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_and_show() {
        let state = test_state().await;
        add(&state, &add_args("Dune", "6", "9.99")).await.unwrap();
        let emma = add(&state, &AddArgs {
            author: "Jane Austen".to_string(),
            ..add_args("Emma", "6", "7.50")
        })
        .await
        .unwrap();

        let hits = search(&state, &SearchArgs {
            author: "austen".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(hits.books.len(), 1);
        assert_eq!(hits.books[0].book_title, "Emma");

        let all = search(&state, &SearchArgs::default()).await.unwrap();
        assert_eq!(all.books.len(), 2);

        let shown = show(&state, emma.book.serial_number).await.unwrap();
        assert_eq!(shown, emma.book);

        let err = show(&state, 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_stock_records_delta() {
        let state = test_state().await;
        let added = add(&state, &add_args("Dune", "10", "9.99")).await.unwrap();

        let result = update(&state, &UpdateArgs {
            serial: added.book.serial_number,
            stock: Some("7".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(result.before.stock, 10);
        assert_eq!(result.after.stock, 7);
        assert_eq!(result.stock_delta, 3);
        assert!(result.low_stock.is_none());

        let rows = state.db().reports().list_all().await.unwrap();
        let updates: Vec<_> = rows
            .iter()
            .filter(|r| r.transaction_type == TransactionType::Updates)
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].stock, 3);
    }

    #[tokio::test]
    async fn test_update_requires_a_field() {
        let state = test_state().await;
        let added = add(&state, &add_args("Dune", "10", "9.99")).await.unwrap();

        let err = update(&state, &UpdateArgs {
            serial: added.book.serial_number,
            ..Default::default()
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = update(&state, &UpdateArgs {
            serial: 999,
            title: Some("Other".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delete_removes_and_logs() {
        let state = test_state().await;
        let added = add(&state, &add_args("Dune", "3", "9.99")).await.unwrap();
        assert!(added.low_stock.is_some());

        let deleted = delete(&state, added.book.serial_number).await.unwrap();
        assert_eq!(deleted.removed.book_title, "Dune");
        assert!(deleted.low_stock.is_none());
        assert!(list(&state).await.unwrap().books.is_empty());

        let rows = state.db().reports().list_all().await.unwrap();
        assert_eq!(rows.last().unwrap().transaction_type, TransactionType::Deletions);
        assert_eq!(rows.last().unwrap().stock, 3);

        let err = delete(&state, added.book.serial_number).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_low_stock_listing() {
        let state = test_state().await;
        assert!(low_stock(&state).await.unwrap().alert.is_none());

        add(&state, &add_args("Dune", "2", "9.99")).await.unwrap();
        add(&state, &add_args("Emma", "8", "9.99")).await.unwrap();

        let alert = low_stock(&state).await.unwrap().alert.unwrap();
        assert_eq!(alert.books.len(), 1);
        assert!(alert.message().contains("Dune by Frank Herbert (2 left)"));
    }
}
