//! Existing-record snapshot and classified batches

use std::collections::HashMap;

use serde::Serialize;

use super::WorkOrderDraft;

/// Read-only snapshot of existing work orders: identifier -> persisted id.
///
/// Taken once when the file is parsed. Records written by someone else after
/// that point are not seen by this run.
#[derive(Debug, Clone, Default)]
pub struct ExistingIndex {
    ids: HashMap<String, String>,
}

impl ExistingIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (identifier, persisted id) pairs. Identifiers are trimmed;
    /// when an identifier repeats, the first pair wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut index = Self::new();
        let mut duplicate_count = 0usize;

        for (identifier, id) in pairs {
            let key = identifier.as_ref().trim();
            if key.is_empty() {
                continue;
            }
            if index.ids.contains_key(key) {
                duplicate_count += 1;
            } else {
                index.ids.insert(key.to_string(), id.into());
            }
        }

        if duplicate_count > 0 {
            log::warn!(
                "Existing records contain {} repeated identifiers (using first occurrence)",
                duplicate_count
            );
        }

        index
    }

    /// Persisted id of the record with this identifier
    pub fn id_for(&self, identifier: &str) -> Option<&str> {
        self.ids.get(identifier.trim()).map(|s| s.as_str())
    }

    /// Check whether an identifier exists
    pub fn contains(&self, identifier: &str) -> bool {
        self.ids.contains_key(identifier.trim())
    }

    /// Number of existing records
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if there are no existing records
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A draft whose identifier collides with an existing record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateDraft {
    /// Persisted id of the existing record
    pub existing_id: String,
    pub draft: WorkOrderDraft,
}

/// A row that re-uses an identifier already seen earlier in the same file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatedRow {
    pub row: usize,
    pub identifier: String,
    /// Row of the first occurrence, which is the one kept
    pub first_row: usize,
}

impl std::fmt::Display for RepeatedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Row {}: identifier '{}' already appears in row {} (ignored)",
            self.row, self.identifier, self.first_row
        )
    }
}

/// Validated drafts partitioned into new and duplicate
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedBatch {
    /// Identifier unseen in the existing records
    pub new: Vec<WorkOrderDraft>,
    /// Identifier collides with an existing record
    pub duplicate: Vec<DuplicateDraft>,
    /// Later rows repeating an identifier within the file
    pub repeated: Vec<RepeatedRow>,
}

impl ClassifiedBatch {
    /// Number of classified drafts (new + duplicate)
    pub fn total(&self) -> usize {
        self.new.len() + self.duplicate.len()
    }

    /// Check whether an operator decision on duplicates is needed
    pub fn has_duplicates(&self) -> bool {
        !self.duplicate.is_empty()
    }

    /// Identifiers of new drafts, in order
    pub fn new_identifiers(&self) -> Vec<&str> {
        self.new.iter().map(|d| d.key()).collect()
    }

    /// Identifiers of duplicate drafts, in order
    pub fn duplicate_identifiers(&self) -> Vec<&str> {
        self.duplicate.iter().map(|d| d.draft.key()).collect()
    }
}
