//! # folio-db: Shop Database
//!
//! SQLite storage for the inventory, the report log and the shop password.
//!
//! ```text
//! folio-cli ──► Database (pool.rs)
//!                  ├── books()        BookRepository        inventory + its report rows
//!                  ├── reports()      ReportRepository      date/type filtered log
//!                  └── credentials()  CredentialRepository  argon2 hash, one row
//!                         │
//!                         ▼
//!               folio.db  (WAL, migrations embedded from migrations/sqlite)
//! ```
//!
//! Every statement is parameterized. Each stock-changing operation writes
//! the record and its report row in one transaction, so the log never
//! disagrees with the shelf.
//!
//! ```rust,ignore
//! use folio_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("folio.db")).await?;
//! let sale = db.books().purchase(12, 3).await?;
//! let low = db.books().low_stock().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig};
pub use repository::book::{BookRepository, PurchaseOutcome};
pub use repository::credential::CredentialRepository;
pub use repository::report::ReportRepository;
