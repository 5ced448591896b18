//! Commit outcome

use serde::Serialize;

use super::{ImportOperation, OperationKind};

/// A failed operation with enough context to locate the offending row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    pub kind: OperationKind,
    pub identifier: String,
    /// Spreadsheet row the draft came from
    pub row: usize,
    /// Underlying persistence error
    pub message: String,
}

impl OperationFailure {
    /// Record a failure of the given operation
    pub fn new(operation: &ImportOperation, message: impl Into<String>) -> Self {
        OperationFailure {
            kind: operation.kind(),
            identifier: operation.identifier().to_string(),
            row: operation.draft().row,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.identifier, self.message)
    }
}

/// Aggregate outcome of a commit run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub success_count: usize,
    pub error_count: usize,
    /// Operations never dispatched because the run was cancelled
    pub skipped_count: usize,
    /// Failures in operation order
    pub errors: Vec<OperationFailure>,
}

impl ImportResult {
    /// Total operations accounted for
    pub fn total(&self) -> usize {
        self.success_count + self.error_count + self.skipped_count
    }

    /// Whether every dispatched operation succeeded and none were skipped
    pub fn is_complete_success(&self) -> bool {
        self.error_count == 0 && self.skipped_count == 0
    }

    /// Whether the run stopped early
    pub fn was_cancelled(&self) -> bool {
        self.skipped_count > 0
    }

    /// Human-readable failure lines, e.g. "Create OT-2024-005: disk full"
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::types::WorkOrderDraft;
    use chrono::NaiveDate;

    #[test]
    fn test_failure_message_names_operation() {
        let draft = WorkOrderDraft::new(4, "OT-2024-005", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let op = ImportOperation::create(draft);
        let failure = OperationFailure::new(&op, "UNIQUE constraint failed");

        assert_eq!(failure.row, 4);
        assert_eq!(failure.to_string(), "Create OT-2024-005: UNIQUE constraint failed");
    }

    #[test]
    fn test_result_totals() {
        let result = ImportResult {
            success_count: 3,
            error_count: 1,
            skipped_count: 2,
            errors: Vec::new(),
        };
        assert_eq!(result.total(), 6);
        assert!(result.was_cancelled());
        assert!(!result.is_complete_success());
    }
}
