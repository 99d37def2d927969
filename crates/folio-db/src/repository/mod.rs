//! # Repository Module
//!
//! Database repository implementations for Folio.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  folio-cli command                                                     │
//! │       │                                                                 │
//! │       │  db.books().purchase(12, 3)                                    │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── insert / get / list_all / search                                  │
//! │  ├── update / delete / purchase                                        │
//! │  └── low_stock                                                         │
//! │       │                                                                 │
//! │       │  Parameterized SQL, one transaction per mutation               │
//! │       ▼                                                                 │
//! │  inventory ───────────────► reports (one row per mutation)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! User input never reaches SQL text; every value is a bound parameter.
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Inventory records and the purchase workflow
//! - [`ReportRepository`](report::ReportRepository) - Report queries
//! - [`CredentialRepository`](credential::CredentialRepository) - Shop password hash

pub mod book;
pub mod credential;
pub mod report;
