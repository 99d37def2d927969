//! # Report Repository
//!
//! Reads the `reports` event log. Rows are only ever appended, by
//! [`append_entry`], inside the transaction of the mutation they describe.
//!
//! ## Query Shape
//! ```text
//! from ≤ date_performed ≤ to        (both ends inclusive)
//! AND (type is ALL OR transaction_type = type)
//! ORDER BY date_performed
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use folio_core::types::record_time;
use folio_core::{CoreError, NewReportEntry, ReportEntry, ReportFilter};

/// Repository for report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Rows inside the filter's date range, optionally of one kind.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let filter = ReportFilter::new(from, to, TransactionType::Sales)?;
    /// let sales = db.reports().list(&filter).await?;
    /// ```
    pub async fn list(&self, filter: &ReportFilter) -> DbResult<Vec<ReportEntry>> {
        debug!(
            from = %filter.from,
            to = %filter.to,
            kind = %filter.transaction_type,
            "Querying reports"
        );

        let entries = sqlx::query_as::<_, ReportEntry>(
            r#"
            SELECT
                serial_number, book_title, author_name, stock,
                price, total, date_performed, transaction_type
            FROM reports
            WHERE date_performed >= ?1
              AND date_performed <= ?2
              AND (?3 IS NULL OR transaction_type = ?3)
            ORDER BY date_performed, serial_number
            "#,
        )
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.stored_type())
        .fetch_all(&self.pool)
        .await?;

        debug!(count = entries.len(), "Report query returned rows");
        Ok(entries)
    }

    /// Every row, in the order it was written.
    pub async fn list_all(&self) -> DbResult<Vec<ReportEntry>> {
        let entries = sqlx::query_as::<_, ReportEntry>(
            r#"
            SELECT
                serial_number, book_title, author_name, stock,
                price, total, date_performed, transaction_type
            FROM reports
            ORDER BY serial_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Appends one row on an open connection or transaction.
///
/// `ALL` is query-only and is refused.
pub(crate) async fn append_entry(
    conn: &mut SqliteConnection,
    entry: &NewReportEntry,
) -> DbResult<i64> {
    if !entry.transaction_type.is_recordable() {
        return Err(DbError::Rule(CoreError::QueryOnlyTransactionType));
    }

    let id = sqlx::query(
        r#"
        INSERT INTO reports (
            book_title, author_name, stock, price, total,
            date_performed, transaction_type
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&entry.book_title)
    .bind(&entry.author_name)
    .bind(entry.stock)
    .bind(entry.price_cents)
    .bind(entry.total_cents)
    .bind(record_time(entry.date_performed))
    .bind(entry.transaction_type)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    debug!(
        id,
        kind = %entry.transaction_type,
        stock = entry.stock,
        "Report row appended"
    );
    Ok(id)
}

// =============================================================================
// Unit Tests
// =============================================================================
