//! # Commands Module
//!
//! One async function per `folio` subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (shared helpers)
//! ├── book.rs     ◄─── add, search, list, show, update, delete, low-stock
//! ├── purchase.rs ◄─── buy
//! ├── report.rs   ◄─── report (+ date range parsing, export)
//! └── session.rs  ◄─── login gate, passwd
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  folio buy 12 3                                                         │
//! │         │                                                               │
//! │         │ (clap)                                                        │
//! │         ▼                                                               │
//! │  pub async fn buy(                                                      │
//! │      state: &AppState,       ◄── Database + AppConfig                   │
//! │      serial: i64,            ◄── From the command line                  │
//! │      quantity: &str,         ◄── Parsed by folio_core::validation       │
//! │  ) -> Result<PurchaseResult, AppError>                                  │
//! │         │                                                               │
//! │         │ (render::emit)                                                │
//! │         ▼                                                               │
//! │  stdout: text, or JSON with --json                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutating commands return the current low-stock alert along with their
//! result so the operator sees it right after the change.

pub mod book;
pub mod purchase;
pub mod report;
pub mod session;

use folio_core::LowStockAlert;
use folio_db::Database;
use tracing::debug;

use crate::error::AppError;

/// Queries the low-stock records and builds the alert, if any.
pub async fn low_stock_alert(db: &Database) -> Result<Option<LowStockAlert>, AppError> {
    let books = db.books().low_stock().await?;
    debug!(count = books.len(), "Low stock check");
    Ok(LowStockAlert::from_books(&books))
}
