//! # Domain Types
//!
//! Core domain types used throughout Folio.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │   ReportEntry   │   │ TransactionType │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  serial_number  │   │  serial_number  │   │  0 All (query)  │       │
//! │  │  book_title     │   │  book_title     │   │  1 Sales        │       │
//! │  │  author_name    │   │  stock (moved)  │   │  2 Updates      │       │
//! │  │  stock          │   │  total_cents    │   │  3 Deletions    │       │
//! │  │  price_cents    │   │  transaction    │   │  4 Additions    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  NewBook ──insert──► Book ──every mutation──► NewReportEntry           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serial numbers are SQLite autoincrement keys; they are never reused.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, ValidationError};
use crate::inventory::{is_low_stock, stock_delta};
use crate::money::Money;
use crate::validation::validate_date_range;

/// Drops sub-second precision so stored timestamps compare as plain text.
#[inline]
pub fn record_time(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(0)
}

// =============================================================================
// Transaction Type
// =============================================================================

/// Kind of event recorded in the `reports` table.
///
/// The integer codes are part of the storage format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum TransactionType {
    /// Query-only: matches every recorded kind. Never stored.
    All = 0,
    /// Copies sold through the purchase workflow.
    Sales = 1,
    /// A record was edited.
    Updates = 2,
    /// A record was removed.
    Deletions = 3,
    /// A record was added.
    Additions = 4,
}

impl TransactionType {
    /// Every kind that can appear in a stored report row.
    pub const RECORDED: [TransactionType; 4] = [
        TransactionType::Sales,
        TransactionType::Updates,
        TransactionType::Deletions,
        TransactionType::Additions,
    ];

    /// Returns the storage code.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Maps a storage code back to its kind.
    pub fn from_code(code: i32) -> Result<Self, CoreError> {
        match code {
            0 => Ok(TransactionType::All),
            1 => Ok(TransactionType::Sales),
            2 => Ok(TransactionType::Updates),
            3 => Ok(TransactionType::Deletions),
            4 => Ok(TransactionType::Additions),
            other => Err(CoreError::UnknownTransactionType(other)),
        }
    }

    /// Row label used in exports.
    pub const fn label(self) -> &'static str {
        match self {
            TransactionType::Sales => "Sales",
            TransactionType::Updates => "Update",
            TransactionType::Deletions => "Deletion",
            TransactionType::Additions => "Addition",
            TransactionType::All => "Unknown",
        }
    }

    /// Title used in report headings ("All transactions" for `All`).
    pub const fn heading(self) -> &'static str {
        match self {
            TransactionType::All => "All transactions",
            other => other.label(),
        }
    }

    /// Whether rows of this kind can be written to the `reports` table.
    #[inline]
    pub const fn is_recordable(self) -> bool {
        !matches!(self, TransactionType::All)
    }
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::All
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TransactionType::All),
            "sales" | "sale" => Ok(TransactionType::Sales),
            "updates" | "update" => Ok(TransactionType::Updates),
            "deletions" | "deletion" => Ok(TransactionType::Deletions),
            "additions" | "addition" => Ok(TransactionType::Additions),
            _ => Err(ValidationError::NotAllowed {
                field: "transaction type".to_string(),
                allowed: ["all", "sales", "updates", "deletions", "additions"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// One inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    /// Autoincrement key.
    pub serial_number: i64,

    pub book_title: String,

    pub author_name: String,

    pub publisher: String,

    /// When the book was added to the inventory.
    pub date_time: DateTime<Utc>,

    /// Copies on the shelf.
    pub stock: i64,

    /// Unit price in cents (`price` column).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price"))]
    pub price_cents: i64,

    /// Where in the shop the book is physically kept.
    pub location: String,

    /// PNG bytes of the cover page.
    #[serde(skip_serializing, default)]
    pub book_cover: Option<Vec<u8>>,
}

impl Book {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn is_low_stock(&self) -> bool {
        is_low_stock(self.stock)
    }

    #[inline]
    pub fn has_cover(&self) -> bool {
        self.book_cover.is_some()
    }
}

/// A book about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub book_title: String,
    pub author_name: String,
    pub publisher: String,
    pub date_time: DateTime<Utc>,
    pub stock: i64,
    pub price_cents: i64,
    pub location: String,
    #[serde(skip_serializing, default)]
    pub book_cover: Option<Vec<u8>>,
}

impl NewBook {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Book Changes
// =============================================================================

/// What an update does to the cover image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CoverChange {
    #[default]
    Keep,
    Replace(Vec<u8>),
    Remove,
}

/// A partial update of one record. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub book_title: Option<String>,
    pub author_name: Option<String>,
    pub publisher: Option<String>,
    pub stock: Option<i64>,
    pub price_cents: Option<i64>,
    pub location: Option<String>,
    pub cover: CoverChange,
}

impl BookChanges {
    /// Returns true when applying these changes would touch nothing.
    pub fn is_empty(&self) -> bool {
        self.book_title.is_none()
            && self.author_name.is_none()
            && self.publisher.is_none()
            && self.stock.is_none()
            && self.price_cents.is_none()
            && self.location.is_none()
            && self.cover == CoverChange::Keep
    }

    /// Produces the record as it will look after the update.
    ///
    /// Serial number and date added are never changed.
    pub fn apply(&self, book: &Book) -> Book {
        let pick = |new: &Option<String>, old: &String| new.clone().unwrap_or_else(|| old.clone());

        Book {
            serial_number: book.serial_number,
            book_title: pick(&self.book_title, &book.book_title),
            author_name: pick(&self.author_name, &book.author_name),
            publisher: pick(&self.publisher, &book.publisher),
            date_time: book.date_time,
            stock: self.stock.unwrap_or(book.stock),
            price_cents: self.price_cents.unwrap_or(book.price_cents),
            location: pick(&self.location, &book.location),
            book_cover: match &self.cover {
                CoverChange::Keep => book.book_cover.clone(),
                CoverChange::Replace(bytes) => Some(bytes.clone()),
                CoverChange::Remove => None,
            },
        }
    }
}

// =============================================================================
// Report Entries
// =============================================================================

/// One stored report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReportEntry {
    pub serial_number: i64,
    pub book_title: String,
    pub author_name: String,
    /// Units moved by the event (see [`NewReportEntry`] for each kind).
    pub stock: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price"))]
    pub price_cents: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "total"))]
    pub total_cents: i64,
    pub date_performed: DateTime<Utc>,
    pub transaction_type: TransactionType,
}

impl ReportEntry {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A report row about to be appended.
///
/// ## Row Rules
/// ```text
/// kind        stock                         price        total
/// ─────────   ───────────────────────────   ──────────   ──────────────
/// Additions   copies added                  unit price   stock × price
/// Sales       copies sold                   unit price   qty × price
/// Updates     |old − new| (new if equal)    new price    0
/// Deletions   copies on shelf when deleted  unit price   0
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReportEntry {
    pub book_title: String,
    pub author_name: String,
    pub stock: i64,
    pub price_cents: i64,
    pub total_cents: i64,
    pub date_performed: DateTime<Utc>,
    pub transaction_type: TransactionType,
}

impl NewReportEntry {
    pub fn addition(book: &Book, at: DateTime<Utc>) -> Self {
        NewReportEntry {
            book_title: book.book_title.clone(),
            author_name: book.author_name.clone(),
            stock: book.stock,
            price_cents: book.price_cents,
            total_cents: book.price().times(book.stock).cents(),
            date_performed: record_time(at),
            transaction_type: TransactionType::Additions,
        }
    }

    pub fn sale(book: &Book, quantity: i64, at: DateTime<Utc>) -> Self {
        NewReportEntry {
            book_title: book.book_title.clone(),
            author_name: book.author_name.clone(),
            stock: quantity,
            price_cents: book.price_cents,
            total_cents: book.price().times(quantity).cents(),
            date_performed: record_time(at),
            transaction_type: TransactionType::Sales,
        }
    }

    pub fn update(before: &Book, after: &Book, at: DateTime<Utc>) -> Self {
        NewReportEntry {
            book_title: after.book_title.clone(),
            author_name: after.author_name.clone(),
            stock: stock_delta(before.stock, after.stock),
            price_cents: after.price_cents,
            total_cents: 0,
            date_performed: record_time(at),
            transaction_type: TransactionType::Updates,
        }
    }

    pub fn deletion(book: &Book, at: DateTime<Utc>) -> Self {
        NewReportEntry {
            book_title: book.book_title.clone(),
            author_name: book.author_name.clone(),
            stock: book.stock,
            price_cents: book.price_cents,
            total_cents: 0,
            date_performed: record_time(at),
            transaction_type: TransactionType::Deletions,
        }
    }
}

// =============================================================================
// Report Filter
// =============================================================================

/// Date range (inclusive at both ends) plus an optional kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub transaction_type: TransactionType,
}

impl ReportFilter {
    /// Builds a filter, rejecting reversed ranges.
    pub fn new(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        transaction_type: TransactionType,
    ) -> Result<Self, ValidationError> {
        validate_date_range(from, to)?;
        Ok(ReportFilter {
            from,
            to,
            transaction_type,
        })
    }

    /// The kind to filter on, or `None` for every kind.
    pub fn stored_type(&self) -> Option<TransactionType> {
        self.transaction_type
            .is_recordable()
            .then_some(self.transaction_type)
    }

    /// In-memory equivalent of the SQL filter.
    pub fn matches(&self, entry: &ReportEntry) -> bool {
        let in_range = entry.date_performed >= self.from && entry.date_performed <= self.to;
        let kind_ok = self
            .stored_type()
            .map_or(true, |kind| entry.transaction_type == kind);
        in_range && kind_ok
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
