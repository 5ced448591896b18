//! One import run: headers, validation, classification, planning
//!
//! [`prepare_import`] runs every stage that does not write anything and keeps
//! the results around for the operator report. Operations are only produced
//! by [`PreparedImport::plan`] once validation is clean.

use serde::Serialize;

use crate::import::classify::classify;
use crate::import::headers::{HeaderAliases, resolve_headers};
use crate::import::normalize::normalize_row;
use crate::import::resolve::resolve;
use crate::import::types::{
    CanonicalField, ClassifiedBatch, DuplicateStrategy, ExistingIndex, HeaderMap,
    ImportError, ImportOperation, RawTable, RowError,
};
use crate::services::matching::NameIndex;

/// Read-only state of the system taken once per run
#[derive(Debug, Clone, Default)]
pub struct ImportSnapshot {
    /// Existing work orders by identifier
    pub existing: ExistingIndex,
    /// Canonical collaborator names (technicians, supervisors, salespeople)
    pub collaborators: NameIndex,
    /// Canonical service names
    pub services: NameIndex,
}

/// Result of the non-writing stages of an import
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub header_map: HeaderMap,
    /// Data rows in the table
    pub total_rows: usize,
    /// Rows that passed validation
    pub valid_rows: usize,
    /// Validation errors, in row order
    pub row_errors: Vec<RowError>,
    pub batch: ClassifiedBatch,
}

/// Counts shown to the operator and emitted as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub error_count: usize,
    pub new_count: usize,
    pub duplicate_count: usize,
    pub repeated_count: usize,
    pub unmapped_fields: Vec<CanonicalField>,
}

/// Run header resolution, row validation and classification over a table
pub fn prepare_import(
    table: &RawTable,
    snapshot: &ImportSnapshot,
    aliases: &HeaderAliases,
) -> Result<PreparedImport, ImportError> {
    if table.is_empty() {
        return Err(ImportError::EmptyTable);
    }

    let header_map = resolve_headers(&table.headers, aliases);
    log::info!(
        "Resolved {} of {} fields from {} columns",
        header_map.len(),
        CanonicalField::all().len(),
        table.headers.len()
    );

    let mut drafts = Vec::with_capacity(table.len());
    let mut row_errors = Vec::new();

    for (index, raw) in table.rows.iter().enumerate() {
        match normalize_row(
            index,
            raw,
            &header_map,
            &snapshot.collaborators,
            &snapshot.services,
        ) {
            Ok(draft) => drafts.push(draft),
            Err(errors) => {
                for error in &errors {
                    log::debug!("{}", error);
                }
                row_errors.extend(errors);
            }
        }
    }

    let valid_rows = drafts.len();
    if !row_errors.is_empty() {
        log::warn!(
            "{} validation errors in {} rows",
            row_errors.len(),
            table.len() - valid_rows
        );
    }

    let batch = classify(drafts, &snapshot.existing);

    Ok(PreparedImport {
        header_map,
        total_rows: table.len(),
        valid_rows,
        row_errors,
        batch,
    })
}

impl PreparedImport {
    /// Whether every row passed validation
    pub fn is_valid(&self) -> bool {
        self.row_errors.is_empty()
    }

    /// Whether the operator has to pick a duplicate strategy
    pub fn needs_strategy(&self) -> bool {
        self.batch.has_duplicates()
    }

    /// Number of rows with at least one validation error
    pub fn invalid_rows(&self) -> usize {
        self.total_rows - self.valid_rows
    }

    /// Build the operations for a strategy. Refused while validation errors exist.
    pub fn plan(&self, strategy: DuplicateStrategy) -> Result<Vec<ImportOperation>, ImportError> {
        if !self.is_valid() {
            return Err(ImportError::ValidationPending {
                error_count: self.row_errors.len(),
            });
        }
        Ok(resolve(&self.batch, strategy))
    }

    /// Counts for reporting
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            total_rows: self.total_rows,
            valid_rows: self.valid_rows,
            invalid_rows: self.invalid_rows(),
            error_count: self.row_errors.len(),
            new_count: self.batch.new.len(),
            duplicate_count: self.batch.duplicate.len(),
            repeated_count: self.batch.repeated.len(),
            unmapped_fields: self.header_map.unmapped(),
        }
    }
}
