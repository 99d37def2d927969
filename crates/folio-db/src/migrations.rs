//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied on connect, so a fresh shop database is usable on first launch.
//!
//! ```text
//! 001_initial_schema.sql   inventory, reports (type code CHECK 1..4)
//! 002_inventory_fts.sql    inventory_fts + sync triggers
//! 003_credentials.sql      single-row shop password table
//! ```
//!
//! Files are append-only: a shipped migration is never edited, a change
//! gets the next number.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database is behind the embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migrations compiled into this build
    pub known: usize,
    /// Migrations recorded in `_sqlx_migrations`
    pub applied: usize,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.known
    }
}

/// Applies every migration the database has not recorded yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = migration_status(pool).await?;
    if before.is_current() {
        debug!(applied = before.applied, "Schema up to date");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;
    info!(
        from = before.applied,
        to = before.known,
        "Schema migrated"
    );
    Ok(())
}

pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    // Missing table means nothing has run yet
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok(MigrationStatus {
        known: MIGRATOR.iter().count(),
        applied: usize::try_from(applied).unwrap_or(0),
    })
}
