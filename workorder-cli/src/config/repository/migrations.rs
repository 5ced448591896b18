//! Schema migrations
//!
//! SQL files under `workorder-cli/migrations/` are embedded at build time and
//! tracked by sqlx in `_sqlx_migrations`.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to apply database migrations")?;
    log::debug!("Database schema at version {}", latest_version());
    Ok(())
}

/// Latest schema version known to this build
pub fn latest_version() -> i64 {
    MIGRATOR.iter().map(|m| m.version).max().unwrap_or(0)
}
