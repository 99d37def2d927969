//! # Book Repository
//!
//! Database operations for inventory records.
//!
//! ## Key Operations
//! - Full-text search using FTS5
//! - Insert / update / delete, each logging one report row
//! - The purchase workflow
//! - Low-stock query
//!
//! ## Mutation Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Every Mutation Is One Transaction                       │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── read current row (NotFound → rollback)                          │
//! │    ├── folio-core rule check (InsufficientStock → rollback)            │
//! │    ├── write inventory                                                  │
//! │    └── append reports row                                               │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either both tables change or neither does.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## FTS5 Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator types: title "dune", author "herbert"                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fts_query() → "dune"* OR "herbert"*                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  inventory_fts MATCH ?1 ORDER BY rank                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Best matches first; a book matching both terms outranks one match     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::report::append_entry;
use folio_core::inventory::{quote_purchase, LOW_STOCK_THRESHOLD};
use folio_core::types::record_time;
use folio_core::validation::{validate_changes, validate_new_book, validate_stock};
use folio_core::{Book, BookChanges, CoreError, NewBook, NewReportEntry, PurchaseQuote};

/// Result of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOutcome {
    /// The record after the stock was decremented.
    pub book: Book,
    pub quote: PurchaseQuote,
}

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(pool);
///
/// let added = repo.insert(&new_book).await?;
/// let hits = repo.search("dune", "", 20).await?;
/// let sold = repo.purchase(added.serial_number, 2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gets a book by its serial number.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - No such serial number
    pub async fn get(&self, serial_number: i64) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT
                serial_number, book_title, author_name, publisher,
                date_time, stock, price, location, book_cover
            FROM inventory
            WHERE serial_number = ?1
            "#,
        )
        .bind(serial_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Lists every record, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT
                serial_number, book_title, author_name, publisher,
                date_time, stock, price, location, book_cover
            FROM inventory
            ORDER BY serial_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Counts records (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Searches records by title and author.
    ///
    /// ## How It Works
    /// 1. Both terms empty: every record, oldest first (up to `limit`)
    /// 2. Otherwise the words of both terms are prefix-matched against the
    ///    FTS5 index, any word matching
    /// 3. Results are ordered by relevance
    ///
    /// Terms made only of punctuation match nothing.
    pub async fn search(&self, title: &str, author: &str, limit: u32) -> DbResult<Vec<Book>> {
        debug!(title = %title, author = %author, limit = %limit, "Searching books");

        if title.trim().is_empty() && author.trim().is_empty() {
            let books = sqlx::query_as::<_, Book>(
                r#"
                SELECT
                    serial_number, book_title, author_name, publisher,
                    date_time, stock, price, location, book_cover
                FROM inventory
                ORDER BY serial_number
                LIMIT ?1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

            return Ok(books);
        }

        let Some(match_expr) = fts_query(title, author) else {
            return Ok(Vec::new());
        };

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT
                i.serial_number, i.book_title, i.author_name, i.publisher,
                i.date_time, i.stock, i.price, i.location, i.book_cover
            FROM inventory_fts
            INNER JOIN inventory i ON i.serial_number = inventory_fts.rowid
            WHERE inventory_fts MATCH ?1
            ORDER BY rank, i.serial_number
            LIMIT ?2
            "#,
        )
        .bind(&match_expr)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Search returned books");
        Ok(books)
    }

    /// Every record with stock below the low-stock threshold.
    pub async fn low_stock(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT
                serial_number, book_title, author_name, publisher,
                date_time, stock, price, location, book_cover
            FROM inventory
            WHERE stock < ?1
            ORDER BY stock, serial_number
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts a record and logs an ADDITIONS row.
    ///
    /// The ADDITIONS row carries the initial stock and `stock × price`.
    pub async fn insert(&self, book: &NewBook) -> DbResult<Book> {
        validate_new_book(book).map_err(CoreError::from)?;

        debug!(title = %book.book_title, stock = book.stock, "Inserting book");

        let date_time = record_time(book.date_time);
        let mut tx = self.pool.begin().await?;

        let serial_number = sqlx::query(
            r#"
            INSERT INTO inventory (
                book_title, author_name, publisher, date_time,
                stock, price, location, book_cover
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&book.book_title)
        .bind(&book.author_name)
        .bind(&book.publisher)
        .bind(date_time)
        .bind(book.stock)
        .bind(book.price_cents)
        .bind(&book.location)
        .bind(&book.book_cover)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let inserted = Book {
            serial_number,
            book_title: book.book_title.clone(),
            author_name: book.author_name.clone(),
            publisher: book.publisher.clone(),
            date_time,
            stock: book.stock,
            price_cents: book.price_cents,
            location: book.location.clone(),
            book_cover: book.book_cover.clone(),
        };

        append_entry(&mut tx, &NewReportEntry::addition(&inserted, Utc::now())).await?;
        tx.commit().await?;

        info!(serial_number, title = %inserted.book_title, "Book added");
        Ok(inserted)
    }

    /// Applies a partial update and logs an UPDATES row.
    ///
    /// ## Returns
    /// `(before, after)` so callers can show what changed.
    pub async fn update(&self, serial_number: i64, changes: &BookChanges) -> DbResult<(Book, Book)> {
        validate_changes(changes).map_err(CoreError::from)?;

        debug!(serial_number, "Updating book");

        let mut tx = self.pool.begin().await?;
        let before = fetch_for_update(&mut tx, serial_number).await?;
        let after = changes.apply(&before);

        sqlx::query(
            r#"
            UPDATE inventory SET
                book_title = ?2,
                author_name = ?3,
                publisher = ?4,
                stock = ?5,
                price = ?6,
                location = ?7,
                book_cover = ?8
            WHERE serial_number = ?1
            "#,
        )
        .bind(serial_number)
        .bind(&after.book_title)
        .bind(&after.author_name)
        .bind(&after.publisher)
        .bind(after.stock)
        .bind(after.price_cents)
        .bind(&after.location)
        .bind(&after.book_cover)
        .execute(&mut *tx)
        .await?;

        append_entry(&mut tx, &NewReportEntry::update(&before, &after, Utc::now())).await?;
        tx.commit().await?;

        info!(
            serial_number,
            old_stock = before.stock,
            new_stock = after.stock,
            "Book updated"
        );
        Ok((before, after))
    }

    /// Replaces the stock level only (restocking shortcut).
    pub async fn set_stock(&self, serial_number: i64, stock: i64) -> DbResult<(Book, Book)> {
        validate_stock(stock).map_err(CoreError::from)?;
        let changes = BookChanges {
            stock: Some(stock),
            ..Default::default()
        };
        self.update(serial_number, &changes).await
    }

    /// Removes a record and logs a DELETIONS row with its last stock level.
    pub async fn delete(&self, serial_number: i64) -> DbResult<Book> {
        debug!(serial_number, "Deleting book");

        let mut tx = self.pool.begin().await?;
        let book = fetch_for_update(&mut tx, serial_number).await?;

        sqlx::query("DELETE FROM inventory WHERE serial_number = ?1")
            .bind(serial_number)
            .execute(&mut *tx)
            .await?;

        append_entry(&mut tx, &NewReportEntry::deletion(&book, Utc::now())).await?;
        tx.commit().await?;

        info!(serial_number, title = %book.book_title, "Book deleted");
        Ok(book)
    }

    /// Sells `quantity` copies.
    ///
    /// ## Workflow
    /// ```text
    /// quantity > stock  ──► InsufficientStock, nothing written
    /// otherwise         ──► stock -= quantity
    ///                       SALES row (stock = quantity, total = quantity × price)
    /// ```
    ///
    /// The decrement is guarded (`stock >= quantity`) so a concurrent sale
    /// can never drive stock negative.
    pub async fn purchase(&self, serial_number: i64, quantity: i64) -> DbResult<PurchaseOutcome> {
        debug!(serial_number, quantity, "Purchasing");

        let mut tx = self.pool.begin().await?;
        let before = fetch_for_update(&mut tx, serial_number).await?;

        let quote = match quote_purchase(&before, quantity) {
            Ok(quote) => quote,
            Err(e) => {
                warn!(serial_number, quantity, stock = before.stock, error = %e, "Purchase rejected");
                return Err(e.into());
            }
        };

        let result = sqlx::query(
            r#"
            UPDATE inventory
            SET stock = stock - ?1
            WHERE serial_number = ?2 AND stock >= ?1
            "#,
        )
        .bind(quantity)
        .bind(serial_number)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::InsufficientStock {
                title: before.book_title.clone(),
                available: before.stock,
                requested: quantity,
            }
            .into());
        }

        append_entry(&mut tx, &NewReportEntry::sale(&before, quantity, Utc::now())).await?;
        tx.commit().await?;

        let book = Book {
            stock: quote.remaining_stock,
            ..before
        };

        info!(
            serial_number,
            quantity,
            total_cents = quote.total.cents(),
            remaining = quote.remaining_stock,
            "Purchase recorded"
        );
        Ok(PurchaseOutcome { book, quote })
    }
}

/// Reads a record inside a transaction, failing with `BookNotFound`.
async fn fetch_for_update(conn: &mut SqliteConnection, serial_number: i64) -> DbResult<Book> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        SELECT
            serial_number, book_title, author_name, publisher,
            date_time, stock, price, location, book_cover
        FROM inventory
        WHERE serial_number = ?1
        "#,
    )
    .bind(serial_number)
    .fetch_optional(&mut *conn)
    .await?;

    book.ok_or(DbError::Rule(CoreError::BookNotFound(serial_number)))
}

/// Builds an FTS5 MATCH expression from the two search terms.
///
/// Each word becomes a quoted prefix query; words are OR-ed so any of them
/// matches and rank favours rows matching more of them. Returns `None` when
/// no word survives.
pub(crate) fn fts_query(title: &str, author: &str) -> Option<String> {
    let words: Vec<String> = title
        .split(|c: char| !c.is_alphanumeric())
        .chain(author.split(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(|w| format!("\"{}\"*", w.to_lowercase()))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" OR "))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use folio_core::{CoverChange, TransactionType};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_book(title: &str, author: &str, stock: i64, price_cents: i64) -> NewBook {
        NewBook {
            book_title: title.to_string(),
            author_name: author.to_string(),
            publisher: "Penguin".to_string(),
            date_time: Utc::now(),
            stock,
            price_cents,
            location: "Shelf A".to_string(),
            book_cover: None,
        }
    }

    async fn report_rows(db: &Database) -> Vec<folio_core::ReportEntry> {
        db.reports().list_all().await.unwrap()
    }

    #[test]
    fn test_fts_query_building() {
        assert_eq!(fts_query("Dune", ""), Some("\"dune\"*".to_string()));
        assert_eq!(
            fts_query("The Hobbit", "Tolkien"),
            Some("\"the\"* OR \"hobbit\"* OR \"tolkien\"*".to_string())
        );
        // Quotes and FTS operators never reach the MATCH string
        assert_eq!(
            fts_query("\"x\" AND (y", ""),
            Some("\"x\"* OR \"and\"* OR \"y\"*".to_string())
        );
        assert_eq!(fts_query("!!!", "--"), None);
    }

    #[tokio::test]
    async fn test_insert_logs_addition() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 5, 999)).await.unwrap();

        assert!(book.serial_number > 0);
        assert_eq!(book.date_time.timestamp_subsec_nanos(), 0);

        let fetched = db.books().get(book.serial_number).await.unwrap().unwrap();
        assert_eq!(fetched, book);

        let rows = report_rows(&db).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_type, TransactionType::Additions);
        assert_eq!(rows[0].stock, 5);
        assert_eq!(rows[0].total_cents, 4995);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_book() {
        let db = test_db().await;
        let result = db.books().insert(&new_book("Dune", "Frank Herbert", 0, 999)).await;
        assert!(matches!(result, Err(DbError::Rule(CoreError::Validation(_)))));

        let result = db.books().insert(&new_book("", "Frank Herbert", 3, 999)).await;
        assert!(result.is_err());

        assert_eq!(db.books().count().await.unwrap(), 0);
        assert!(report_rows(&db).await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_oversized_stock_and_price() {
        use folio_core::validation::{MAX_PRICE_CENTS, MAX_STOCK};

        let db = test_db().await;
        let huge = new_book("Dune", "Frank Herbert", 100_000_000_000_000_000, 100_000);
        let result = db.books().insert(&huge).await;
        assert!(matches!(result, Err(DbError::Rule(CoreError::Validation(_)))));

        let pricey = new_book("Dune", "Frank Herbert", 1, MAX_PRICE_CENTS + 1);
        assert!(db.books().insert(&pricey).await.is_err());
        assert_eq!(db.books().count().await.unwrap(), 0);

        let ceiling = new_book("Dune", "Frank Herbert", MAX_STOCK, MAX_PRICE_CENTS);
        db.books().insert(&ceiling).await.unwrap();
        let rows = report_rows(&db).await;
        assert_eq!(rows[0].total_cents, MAX_STOCK * MAX_PRICE_CENTS);
    }

    #[tokio::test]
    async fn test_low_stock_threshold() {
        let db = test_db().await;
        let stocked = db.books().insert(&new_book("Dune", "Frank Herbert", 5, 999)).await.unwrap();
        let low = db.books().insert(&new_book("Emma", "Jane Austen", 4, 999)).await.unwrap();

        let result = db.books().low_stock().await.unwrap();
        let serials: Vec<i64> = result.iter().map(|b| b.serial_number).collect();
        assert!(serials.contains(&low.serial_number));
        assert!(!serials.contains(&stocked.serial_number));
    }

    #[tokio::test]
    async fn test_purchase_over_stock_is_rejected() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 2, 999)).await.unwrap();

        let result = db.books().purchase(book.serial_number, 3).await;
        assert!(matches!(
            result,
            Err(DbError::Rule(CoreError::InsufficientStock { available: 2, requested: 3, .. }))
        ));

        let after = db.books().get(book.serial_number).await.unwrap().unwrap();
        assert_eq!(after.stock, 2);
        assert_eq!(report_rows(&db).await.len(), 1);
    }

    #[tokio::test]
    async fn test_purchase_decrements_and_logs_sale() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 10, 999)).await.unwrap();

        let outcome = db.books().purchase(book.serial_number, 3).await.unwrap();
        assert_eq!(outcome.book.stock, 7);
        assert_eq!(outcome.quote.total.cents(), 2997);

        let stored = db.books().get(book.serial_number).await.unwrap().unwrap();
        assert_eq!(stored.stock, 7);

        let sales: Vec<_> = report_rows(&db)
            .await
            .into_iter()
            .filter(|r| r.transaction_type == TransactionType::Sales)
            .collect();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].stock, 3);
        assert_eq!(sales[0].total_cents, 2997);
    }

    #[tokio::test]
    async fn test_purchase_whole_stock_and_bad_quantity() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 2, 999)).await.unwrap();

        let outcome = db.books().purchase(book.serial_number, 2).await.unwrap();
        assert_eq!(outcome.book.stock, 0);

        assert!(db.books().purchase(book.serial_number, 0).await.is_err());
        assert!(matches!(
            db.books().purchase(999, 1).await,
            Err(DbError::Rule(CoreError::BookNotFound(999)))
        ));
    }

    #[tokio::test]
    async fn test_delete_logs_deletion() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 6, 999)).await.unwrap();

        let removed = db.books().delete(book.serial_number).await.unwrap();
        assert_eq!(removed.serial_number, book.serial_number);
        assert!(db.books().get(book.serial_number).await.unwrap().is_none());

        let rows = report_rows(&db).await;
        let deletion = rows
            .iter()
            .find(|r| r.transaction_type == TransactionType::Deletions)
            .unwrap();
        assert_eq!(deletion.stock, 6);
        assert_eq!(deletion.total_cents, 0);
        assert_eq!(deletion.book_title, "Dune");

        assert!(matches!(
            db.books().delete(book.serial_number).await,
            Err(DbError::Rule(CoreError::BookNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_logs_stock_delta() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 10, 999)).await.unwrap();

        let changes = BookChanges {
            stock: Some(7),
            ..Default::default()
        };
        let (before, after) = db.books().update(book.serial_number, &changes).await.unwrap();
        assert_eq!(before.stock, 10);
        assert_eq!(after.stock, 7);

        let update = report_rows(&db)
            .await
            .into_iter()
            .find(|r| r.transaction_type == TransactionType::Updates)
            .unwrap();
        assert_eq!(update.stock, 3);
        assert_eq!(update.total_cents, 0);
    }

    #[tokio::test]
    async fn test_update_fields_and_cover() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 10, 999)).await.unwrap();

        let mut png = folio_core::validation::PNG_SIGNATURE.to_vec();
        png.extend_from_slice(b"rest-of-image");

        let changes = BookChanges {
            book_title: Some("Dune Messiah".to_string()),
            price_cents: Some(1299),
            cover: CoverChange::Replace(png.clone()),
            ..Default::default()
        };
        db.books().update(book.serial_number, &changes).await.unwrap();

        let stored = db.books().get(book.serial_number).await.unwrap().unwrap();
        assert_eq!(stored.book_title, "Dune Messiah");
        assert_eq!(stored.price_cents, 1299);
        assert_eq!(stored.stock, 10);
        assert_eq!(stored.book_cover, Some(png));
        assert_eq!(stored.date_time, book.date_time);

        let cleared = BookChanges {
            cover: CoverChange::Remove,
            ..Default::default()
        };
        db.books().update(book.serial_number, &cleared).await.unwrap();
        let stored = db.books().get(book.serial_number).await.unwrap().unwrap();
        assert!(!stored.has_cover());
    }

    #[tokio::test]
    async fn test_update_rejects_zero_stock() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 10, 999)).await.unwrap();

        assert!(db.books().set_stock(book.serial_number, 0).await.is_err());
        assert_eq!(report_rows(&db).await.len(), 1);
    }

    #[tokio::test]
    async fn test_search_by_title_and_author() {
        let db = test_db().await;
        db.books().insert(&new_book("Dune", "Frank Herbert", 5, 999)).await.unwrap();
        db.books().insert(&new_book("Emma", "Jane Austen", 5, 899)).await.unwrap();
        db.books().insert(&new_book("Persuasion", "Jane Austen", 5, 799)).await.unwrap();

        let hits = db.books().search("dun", "", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].book_title, "Dune");

        let hits = db.books().search("", "austen", 20).await.unwrap();
        assert_eq!(hits.len(), 2);

        let all = db.books().search("", "  ", 20).await.unwrap();
        assert_eq!(all.len(), 3);

        let none = db.books().search("zzz", "", 20).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_search_follows_renames_and_deletes() {
        let db = test_db().await;
        let book = db.books().insert(&new_book("Dune", "Frank Herbert", 5, 999)).await.unwrap();

        let changes = BookChanges {
            book_title: Some("Arrakis".to_string()),
            ..Default::default()
        };
        db.books().update(book.serial_number, &changes).await.unwrap();
        assert!(db.books().search("dune", "", 20).await.unwrap().is_empty());
        assert_eq!(db.books().search("arrakis", "", 20).await.unwrap().len(), 1);

        db.books().delete(book.serial_number).await.unwrap();
        assert!(db.books().search("arrakis", "", 20).await.unwrap().is_empty());
    }
}
