//! # Database Handle
//!
//! Opens the shop database and hands out repositories.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  one `folio` invocation                                                 │
//! │                                                                         │
//! │  DbConfig::new("~/.local/share/folio/folio.db")                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new ── open (create file, WAL, busy timeout, FKs)            │
//! │       │          └─ migrate (no-op when current)                        │
//! │       │                                                                 │
//! │       ├── Err ──► caller logs it and exits non-zero                     │
//! │       ▼                                                                 │
//! │  db.books() / db.reports() / db.credentials()                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close()                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A second terminal running `folio` at the same time waits on the busy
//! timeout rather than failing with `SQLITE_BUSY`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::book::BookRepository;
use crate::repository::credential::CredentialRepository;
use crate::repository::report::ReportRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how to open it.
///
/// ## Example
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("folio.db").busy_timeout(Duration::from_secs(10))).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database file; `None` for a private in-memory database.
    pub path: Option<PathBuf>,

    /// Pool size. Default: 4
    pub max_connections: u32,

    /// How long a statement waits for another writer. Default: 5 seconds
    pub busy_timeout: Duration,

    /// How long to wait for a free pooled connection. Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Apply pending migrations on open. Default: true
    pub migrate: bool,
}

impl DbConfig {
    /// File-backed database, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: Some(path.into()),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(30),
            migrate: true,
        }
    }

    /// Fresh, fully migrated database that disappears with the handle.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool
    /// is pinned to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            path: None,
            max_connections: 1,
            busy_timeout: Duration::from_secs(1),
            acquire_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    /// Pool size for file databases. An in-memory database stays at one
    /// connection, since a second one would open a separate empty database.
    pub fn max_connections(mut self, max: u32) -> Self {
        if !self.is_in_memory() {
            self.max_connections = max.max(1);
        }
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Opens without touching the schema.
    pub fn skip_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.path {
            Some(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            None => SqliteConnectOptions::new().in_memory(true),
        };

        options
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout)
            .foreign_keys(true)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(self.acquire_timeout);

        if self.is_in_memory() {
            // Dropping the only connection would drop the data with it
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options.max_connections(self.max_connections)
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open shop database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: Option<PathBuf>,
}

impl Database {
    /// Opens (and if needed creates and migrates) the database.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        match &config.path {
            Some(path) => info!(path = %path.display(), "Opening database"),
            None => debug!("Opening in-memory database"),
        }

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Open(e.to_string()))?;

        let db = Database {
            pool,
            path: config.path,
        };

        if config.migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    /// Database file, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw pool, for tests and one-off maintenance queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inventory records, searches and the stock-changing workflows.
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    pub fn credentials(&self) -> CredentialRepository {
        CredentialRepository::new(self.pool.clone())
    }

    /// Waits for in-flight statements, then closes every connection.
    pub async fn close(&self) {
        debug!("Closing database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
