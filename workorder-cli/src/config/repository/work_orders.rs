//! Work-order persistence

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::import::commit::WorkOrderStore;
use crate::import::types::{WorkOrderDraft, WorkOrderStatus};

/// SQLite-backed store the committer writes through
#[derive(Debug, Clone)]
pub struct SqliteWorkOrderStore {
    pool: SqlitePool,
}

impl SqliteWorkOrderStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkOrderStore for SqliteWorkOrderStore {
    async fn create(&self, draft: &WorkOrderDraft) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO work_orders (
                id, identifier, description, client, salesperson, service,
                start_date, end_date, technicians, supervisors, price, status, invoices
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(draft.key())
        .bind(&draft.description)
        .bind(&draft.client)
        .bind(&draft.salesperson)
        .bind(&draft.service)
        .bind(draft.start_date_iso())
        .bind(draft.end_date.map(|_| draft.end_date_iso()))
        .bind(serde_json::to_string(&draft.technicians)?)
        .bind(serde_json::to_string(&draft.supervisors)?)
        .bind(draft.price)
        .bind(draft.status.label())
        .bind(serde_json::to_string(&draft.invoices)?)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert work order {}", draft.key()))?;

        Ok(id)
    }

    async fn update(&self, id: &str, draft: &WorkOrderDraft) -> Result<()> {
        let result = sqlx::query(
            "UPDATE work_orders SET
                identifier = ?, description = ?, client = ?, salesperson = ?, service = ?,
                start_date = ?, end_date = ?, technicians = ?, supervisors = ?, price = ?,
                status = ?, invoices = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(draft.key())
        .bind(&draft.description)
        .bind(&draft.client)
        .bind(&draft.salesperson)
        .bind(&draft.service)
        .bind(draft.start_date_iso())
        .bind(draft.end_date.map(|_| draft.end_date_iso()))
        .bind(serde_json::to_string(&draft.technicians)?)
        .bind(serde_json::to_string(&draft.supervisors)?)
        .bind(draft.price)
        .bind(draft.status.label())
        .bind(serde_json::to_string(&draft.invoices)?)
        .bind(id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to update work order {}", draft.key()))?;

        if result.rows_affected() == 0 {
            bail!("No work order with id {}", id);
        }
        Ok(())
    }
}

/// A persisted work order
#[derive(Debug, Clone, Serialize)]
pub struct StoredWorkOrder {
    pub id: String,
    pub draft: WorkOrderDraft,
}

/// Look up a work order by identifier
pub async fn find_by_identifier(pool: &SqlitePool, identifier: &str) -> Result<Option<StoredWorkOrder>> {
    let row = sqlx::query(
        "SELECT id, identifier, description, client, salesperson, service, start_date,
                end_date, technicians, supervisors, price, status, invoices
         FROM work_orders WHERE identifier = ?",
    )
    .bind(identifier.trim())
    .fetch_optional(pool)
    .await
    .context("Failed to query work order")?;

    let Some(row) = row else {
        return Ok(None);
    };

    let start_date: String = row.try_get("start_date")?;
    let end_date: Option<String> = row.try_get("end_date")?;
    let status: String = row.try_get("status")?;
    let technicians: String = row.try_get("technicians")?;
    let supervisors: String = row.try_get("supervisors")?;
    let invoices: String = row.try_get("invoices")?;

    let mut draft = WorkOrderDraft::new(0, row.try_get::<String, _>("identifier")?, parse_date(&start_date)?);
    draft.description = row.try_get("description")?;
    draft.client = row.try_get("client")?;
    draft.salesperson = row.try_get("salesperson")?;
    draft.service = row.try_get("service")?;
    draft.end_date = end_date.as_deref().map(parse_date).transpose()?;
    draft.technicians = serde_json::from_str(&technicians).context("Invalid technicians column")?;
    draft.supervisors = serde_json::from_str(&supervisors).context("Invalid supervisors column")?;
    draft.price = row.try_get("price")?;
    draft.status = WorkOrderStatus::from_label(&status).unwrap_or_default();
    draft.invoices = serde_json::from_str(&invoices).context("Invalid invoices column")?;

    Ok(Some(StoredWorkOrder {
        id: row.try_get("id")?,
        draft,
    }))
}

/// Count persisted work orders
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM work_orders")
        .fetch_one(pool)
        .await
        .context("Failed to count work orders")
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid stored date '{}'", text))
}
