//! Normalized work-order drafts produced by row validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Work-order status, always one of a fixed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Closed")]
    Closed,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl WorkOrderStatus {
    /// Display label (also the persisted value)
    pub fn label(&self) -> &'static str {
        match self {
            WorkOrderStatus::NotStarted => "Not Started",
            WorkOrderStatus::InProgress => "In Progress",
            WorkOrderStatus::Closed => "Closed",
            WorkOrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse a persisted label
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Not Started" => Some(WorkOrderStatus::NotStarted),
            "In Progress" => Some(WorkOrderStatus::InProgress),
            "Closed" => Some(WorkOrderStatus::Closed),
            "Cancelled" => Some(WorkOrderStatus::Cancelled),
            _ => None,
        }
    }

    /// All statuses
    pub fn all_variants() -> &'static [WorkOrderStatus] {
        &[
            WorkOrderStatus::NotStarted,
            WorkOrderStatus::InProgress,
            WorkOrderStatus::Closed,
            WorkOrderStatus::Cancelled,
        ]
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Invoice line synthesized from the invoice columns of a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub number: String,
    pub date: NaiveDate,
    pub amount: f64,
}

/// A fully normalized, not-yet-persisted work order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderDraft {
    /// Human-facing spreadsheet row (header is row 1)
    pub row: usize,
    /// Work-order number, trimmed and non-empty
    pub identifier: String,
    pub description: String,
    pub client: String,
    pub salesperson: String,
    pub service: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub technicians: Vec<String>,
    pub supervisors: Vec<String>,
    /// Net price, non-negative
    pub price: f64,
    pub status: WorkOrderStatus,
    #[serde(default)]
    pub invoices: Vec<InvoiceLine>,
}

impl WorkOrderDraft {
    /// Create a draft with the required fields; everything else empty
    pub fn new(row: usize, identifier: impl Into<String>, start_date: NaiveDate) -> Self {
        WorkOrderDraft {
            row,
            identifier: identifier.into().trim().to_string(),
            description: String::new(),
            client: String::new(),
            salesperson: String::new(),
            service: String::new(),
            start_date,
            end_date: None,
            technicians: Vec::new(),
            supervisors: Vec::new(),
            price: 0.0,
            status: WorkOrderStatus::default(),
            invoices: Vec::new(),
        }
    }

    /// Identifier in the form used for every comparison
    pub fn key(&self) -> &str {
        self.identifier.trim()
    }

    /// Start date as `YYYY-MM-DD`
    pub fn start_date_iso(&self) -> String {
        self.start_date.format("%Y-%m-%d").to_string()
    }

    /// End date as `YYYY-MM-DD`, or empty
    pub fn end_date_iso(&self) -> String {
        self.end_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}
