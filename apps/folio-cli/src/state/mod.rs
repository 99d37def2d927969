//! # State Module
//!
//! What a command runs against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────┐         │
//! │  │        Database          │      │        AppConfig         │         │
//! │  │  (folio-db SQLite pool)  │      │  db path, store name,    │         │
//! │  │  books() reports()       │      │  currency, page size     │         │
//! │  │  credentials()           │      │                          │         │
//! │  └────────────┬─────────────┘      └────────────┬─────────────┘         │
//! │               └──────────────┬──────────────────┘                       │
//! │                              ▼                                          │
//! │                         AppState                                        │
//! │                 (one per process, borrowed                              │
//! │                  by every command function)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;

pub use config::{AppConfig, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use folio_db::Database;

/// Database handle plus configuration.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
    config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState { db, config }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
