//! Import operations and duplicate-resolution strategies

use serde::{Deserialize, Serialize};

use super::WorkOrderDraft;

/// Operator choice for rows whose identifier already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateStrategy {
    /// Create new rows only; duplicates are dropped
    #[default]
    SkipDuplicates,
    /// Create new rows and overwrite existing records with duplicate rows
    ReplaceDuplicates,
}

impl DuplicateStrategy {
    /// Canonical name used in configuration and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            DuplicateStrategy::SkipDuplicates => "skip-duplicates",
            DuplicateStrategy::ReplaceDuplicates => "replace-duplicates",
        }
    }

    /// Label for interactive selection
    pub fn label(&self) -> &'static str {
        match self {
            DuplicateStrategy::SkipDuplicates => "Skip duplicates (only create new work orders)",
            DuplicateStrategy::ReplaceDuplicates => {
                "Replace duplicates (update existing work orders)"
            }
        }
    }

    /// All variants for UI selection
    pub fn all_variants() -> &'static [DuplicateStrategy] {
        &[
            DuplicateStrategy::SkipDuplicates,
            DuplicateStrategy::ReplaceDuplicates,
        ]
    }
}

impl std::fmt::Display for DuplicateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DuplicateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip-duplicates" | "skip" => Ok(DuplicateStrategy::SkipDuplicates),
            "replace-duplicates" | "replace" => Ok(DuplicateStrategy::ReplaceDuplicates),
            other => Err(format!(
                "Unknown strategy '{}' (expected 'skip-duplicates' or 'replace-duplicates')",
                other
            )),
        }
    }
}

/// Kind of write an operation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Create,
    Update,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Create => write!(f, "Create"),
            OperationKind::Update => write!(f, "Update"),
        }
    }
}

/// A single write to be dispatched to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ImportOperation {
    /// Insert a new work order
    Create(WorkOrderDraft),
    /// Overwrite the existing record with this persisted id
    Update {
        existing_id: String,
        draft: WorkOrderDraft,
    },
}

impl ImportOperation {
    /// Create a new Create operation
    pub fn create(draft: WorkOrderDraft) -> Self {
        Self::Create(draft)
    }

    /// Create a new Update operation
    pub fn update(existing_id: impl Into<String>, draft: WorkOrderDraft) -> Self {
        Self::Update {
            existing_id: existing_id.into(),
            draft,
        }
    }

    /// Get the operation kind
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Create(_) => OperationKind::Create,
            Self::Update { .. } => OperationKind::Update,
        }
    }

    /// Get the draft written by this operation
    pub fn draft(&self) -> &WorkOrderDraft {
        match self {
            Self::Create(draft) => draft,
            Self::Update { draft, .. } => draft,
        }
    }

    /// Work-order identifier this operation writes
    pub fn identifier(&self) -> &str {
        self.draft().key()
    }

    /// Short description used in failure messages, e.g. "Create OT-2024-005"
    pub fn describe(&self) -> String {
        format!("{} {}", self.kind(), self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(identifier: &str) -> WorkOrderDraft {
        WorkOrderDraft::new(2, identifier, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "skip-duplicates".parse::<DuplicateStrategy>(),
            Ok(DuplicateStrategy::SkipDuplicates)
        );
        assert_eq!(
            "Replace-Duplicates".parse::<DuplicateStrategy>(),
            Ok(DuplicateStrategy::ReplaceDuplicates)
        );
        assert!("merge".parse::<DuplicateStrategy>().is_err());
    }

    #[test]
    fn test_operation_describe() {
        let create = ImportOperation::create(draft("OT-2024-005"));
        let update = ImportOperation::update("abc", draft("OT-2024-006"));

        assert_eq!(create.describe(), "Create OT-2024-005");
        assert_eq!(update.describe(), "Update OT-2024-006");
        assert_eq!(update.kind(), OperationKind::Update);
    }
}
