//! Error types for the import pipeline

use serde::Serialize;

use super::CanonicalField;

/// Offset between a 0-based data row index and the row number an operator
/// sees in the spreadsheet (1-based, header occupies row 1)
pub const HEADER_ROW_OFFSET: usize = 2;

/// Convert a 0-based data row index to the spreadsheet row number
pub fn display_row(index: usize) -> usize {
    index + HEADER_ROW_OFFSET
}

/// Validation error scoped to a single spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// Spreadsheet row number (header is row 1)
    pub row: usize,
    /// Field the error refers to
    pub field: CanonicalField,
    pub message: String,
}

impl RowError {
    /// Create an error for a field of a row
    pub fn field(row: usize, field: CanonicalField, message: impl Into<String>) -> Self {
        RowError {
            row,
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

impl std::error::Error for RowError {}

/// Errors that stop an import before anything is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The file could not be opened or decoded
    Decode { path: String, message: String },
    /// The table has a header row but no data rows
    EmptyTable,
    /// A commit was requested while row validation errors exist
    ValidationPending { error_count: usize },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Decode { path, message } => {
                write!(f, "Failed to decode '{}': {}", path, message)
            }
            ImportError::EmptyTable => write!(f, "The file contains no data rows"),
            ImportError::ValidationPending { error_count } => write!(
                f,
                "{} validation error(s) must be resolved before importing",
                error_count
            ),
        }
    }
}

impl std::error::Error for ImportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_row_offsets_header() {
        assert_eq!(display_row(0), 2);
        assert_eq!(display_row(9), 11);
    }

    #[test]
    fn test_row_error_display() {
        let err = RowError::field(5, CanonicalField::StartDate, "invalid start date 'abc'");
        assert_eq!(err.to_string(), "Row 5: invalid start date 'abc'");
    }
}
