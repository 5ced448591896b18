//! Repository layer for database operations

pub mod migrations;
pub mod registry;
pub mod work_orders;

pub use registry::load_snapshot;
pub use work_orders::SqliteWorkOrderStore;

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Open (creating if needed) the database file and apply migrations
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", path.display()))?;

    migrations::run_migrations(&pool).await?;
    log::debug!("Connected to {}", path.display());
    Ok(pool)
}

/// Private in-memory database with the schema applied
#[cfg(test)]
pub async fn connect_in_memory() -> Result<SqlitePool> {
    use std::str::FromStr;

    // A single connection keeps every query on the same in-memory database
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .context("Invalid in-memory connection string")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("Failed to open in-memory database")?;

    migrations::run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();

        let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM _sqlx_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(version, migrations::latest_version());
        assert_eq!(version, 1);

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('work_orders', 'collaborators', 'services')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 3);
    }

    #[tokio::test]
    async fn test_connect_creates_file() {
        let dir = std::env::temp_dir().join(format!("workorder-db-{}", uuid::Uuid::new_v4()));
        let path = dir.join("orders.db");

        let pool = connect(&path).await.unwrap();
        assert!(path.exists());

        pool.close().await;
        std::fs::remove_dir_all(&dir).ok();
    }
}
