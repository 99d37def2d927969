//! # folio-core: Pure Business Logic for Folio
//!
//! This crate holds the bookshop rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Folio Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     folio-cli (commands)                        │   │
//! │  │    add, search, update, delete, buy, report, browse             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ inventory │  │ validation│  │   │
//! │  │   │   Book    │  │   Money   │  │ low stock │  │   rules   │  │   │
//! │  │   │ ReportRow │  │           │  │ purchase  │  │  parsing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │  report   │  │  browse   │  │   auth    │                 │   │
//! │  │   │  summary  │  │  cursor   │  │  argon2   │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TERMINAL                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    folio-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, ReportEntry, TransactionType, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input parsing and validation
//! - [`inventory`] - Stock rules (low stock, purchase quotes, update deltas)
//! - [`report`] - Report aggregation
//! - [`browse`] - Cursor over an in-memory list of records
//! - [`auth`] - Shop password hashing
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::money::Money;
//! use folio_core::inventory::is_low_stock;
//!
//! let price = Money::parse("9.99").unwrap();
//! assert_eq!(price.times(3).cents(), 2997);
//!
//! assert!(is_low_stock(4));
//! assert!(!is_low_stock(5));
//! ```

pub mod auth;
pub mod browse;
pub mod error;
pub mod inventory;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use browse::RecordCursor;
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{LowStockAlert, PurchaseQuote, LOW_STOCK_THRESHOLD};
pub use money::Money;
pub use report::ReportSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Password stored on first login when no credential exists yet.
pub const DEFAULT_SHOP_PASSWORD: &str = "scope";

/// Longest accepted value for any free-text book field.
pub const MAX_TEXT_FIELD_LEN: usize = 200;

/// Largest accepted cover image, in bytes.
pub const MAX_COVER_BYTES: usize = 2 * 1024 * 1024;
