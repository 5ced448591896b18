//! Subcommand implementations

pub mod check;
pub mod import;
pub mod registry;
pub mod show;

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::config::repository;
use crate::import::{HeaderAliases, PreparedImport, prepare_import, read_table};

/// Open the configured database, applying migrations
pub async fn open_database(config: &Config) -> Result<SqlitePool> {
    let db_path = config.database_path()?;
    repository::connect(&db_path).await
}

/// Decode a file and run the non-writing stages against the database snapshot
pub async fn prepare_from_file(
    file: &Path,
    sheet: Option<&str>,
    config: &Config,
) -> Result<(PreparedImport, SqlitePool)> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let table = read_table(file, sheet)?;

    let pool = open_database(config).await?;
    let snapshot = repository::load_snapshot(&pool)
        .await
        .context("Failed to load existing work orders")?;

    let aliases = HeaderAliases::with_extra(&config.import.aliases);
    let prepared = prepare_import(&table, &snapshot, &aliases)?;

    Ok((prepared, pool))
}
