//! Collaborator and service registries, and the per-run snapshot

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::import::pipeline::ImportSnapshot;
use crate::import::types::ExistingIndex;
use crate::services::matching::NameIndex;

/// Names of active collaborators, in registration order
pub async fn list_collaborators(pool: &SqlitePool) -> Result<Vec<String>> {
    sqlx::query_scalar("SELECT name FROM collaborators WHERE active = 1 ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list collaborators")
}

/// Service names, in registration order
pub async fn list_services(pool: &SqlitePool) -> Result<Vec<String>> {
    sqlx::query_scalar("SELECT name FROM services ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list services")
}

/// Register a collaborator (no-op when the name exists)
pub async fn add_collaborator(pool: &SqlitePool, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO collaborators (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name.trim())
        .execute(pool)
        .await
        .context("Failed to add collaborator")?;
    Ok(())
}

/// Mark a collaborator inactive so it no longer resolves references
pub async fn deactivate_collaborator(pool: &SqlitePool, name: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE collaborators SET active = 0 WHERE name = ?")
        .bind(name.trim())
        .execute(pool)
        .await
        .context("Failed to deactivate collaborator")?;
    Ok(result.rows_affected() > 0)
}

/// Register a service (no-op when the name exists)
pub async fn add_service(pool: &SqlitePool, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO services (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name.trim())
        .execute(pool)
        .await
        .context("Failed to add service")?;
    Ok(())
}

/// Read existing identifiers and the registries for one import run
pub async fn load_snapshot(pool: &SqlitePool) -> Result<ImportSnapshot> {
    let existing: Vec<(String, String)> =
        sqlx::query_as("SELECT identifier, id FROM work_orders ORDER BY created_at, identifier")
            .fetch_all(pool)
            .await
            .context("Failed to load existing work orders")?;

    let collaborators = list_collaborators(pool).await?;
    let services = list_services(pool).await?;

    log::info!(
        "Snapshot: {} existing work orders, {} collaborators, {} services",
        existing.len(),
        collaborators.len(),
        services.len()
    );

    Ok(ImportSnapshot {
        existing: ExistingIndex::from_pairs(existing),
        collaborators: NameIndex::new(collaborators),
        services: NameIndex::new(services),
    })
}
