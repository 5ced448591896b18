//! Raw tabular input and canonical field keys

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::CellValue;

/// One spreadsheet line: original header text -> cell value
pub type RawRow = HashMap<String, CellValue>;

/// A decoded table: header row plus data rows in file order
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Header texts as found in row 1, in column order
    pub headers: Vec<String>,
    /// Data rows in file order
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create a table from headers and rows
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        RawTable { headers, rows }
    }

    /// Build a table from positional rows, pairing each cell with its header.
    /// Cells under blank headers are dropped. When a title repeats, only the
    /// first column with that title is kept.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let keep: Vec<bool> = {
            let mut seen = HashSet::new();
            headers
                .iter()
                .enumerate()
                .map(|(column, h)| {
                    if h.trim().is_empty() {
                        return false;
                    }
                    let first = seen.insert(h.as_str());
                    if !first {
                        log::warn!(
                            "Column {} repeats the header '{}'; only the first one is read",
                            column + 1,
                            h
                        );
                    }
                    first
                })
                .collect()
        };

        let rows = rows
            .into_iter()
            .map(|cells| {
                headers
                    .iter()
                    .zip(&keep)
                    .zip(cells)
                    .filter(|((_, keep), _)| **keep)
                    .map(|((h, _), v)| (h.clone(), v))
                    .collect::<RawRow>()
            })
            .collect();
        RawTable { headers, rows }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Canonical work-order attribute targeted by header resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Identifier,
    StartDate,
    Description,
    Client,
    Salesperson,
    Supervisors,
    Technicians,
    Service,
    Price,
    LegacyStatus,
    Invoiced,
    InvoiceNumber,
    InvoiceDate,
    EndDate,
}

impl CanonicalField {
    /// All canonical fields in resolution order
    pub fn all() -> &'static [CanonicalField] {
        &[
            CanonicalField::Identifier,
            CanonicalField::StartDate,
            CanonicalField::Description,
            CanonicalField::Client,
            CanonicalField::Salesperson,
            CanonicalField::Supervisors,
            CanonicalField::Technicians,
            CanonicalField::Service,
            CanonicalField::Price,
            CanonicalField::LegacyStatus,
            CanonicalField::Invoiced,
            CanonicalField::InvoiceNumber,
            CanonicalField::InvoiceDate,
            CanonicalField::EndDate,
        ]
    }

    /// Configuration key for this field (snake_case)
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::Identifier => "identifier",
            CanonicalField::StartDate => "start_date",
            CanonicalField::Description => "description",
            CanonicalField::Client => "client",
            CanonicalField::Salesperson => "salesperson",
            CanonicalField::Supervisors => "supervisors",
            CanonicalField::Technicians => "technicians",
            CanonicalField::Service => "service",
            CanonicalField::Price => "price",
            CanonicalField::LegacyStatus => "legacy_status",
            CanonicalField::Invoiced => "invoiced",
            CanonicalField::InvoiceNumber => "invoice_number",
            CanonicalField::InvoiceDate => "invoice_date",
            CanonicalField::EndDate => "end_date",
        }
    }

    /// Look up a field by its configuration key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.key() == key)
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::Identifier => "identifier",
            CanonicalField::StartDate => "start date",
            CanonicalField::Description => "description",
            CanonicalField::Client => "client",
            CanonicalField::Salesperson => "salesperson",
            CanonicalField::Supervisors => "supervisors",
            CanonicalField::Technicians => "technicians",
            CanonicalField::Service => "service",
            CanonicalField::Price => "price",
            CanonicalField::LegacyStatus => "legacy status",
            CanonicalField::Invoiced => "invoiced flag",
            CanonicalField::InvoiceNumber => "invoice number",
            CanonicalField::InvoiceDate => "invoice date",
            CanonicalField::EndDate => "end date",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Canonical field -> header text actually found in this file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    mapped: HashMap<CanonicalField, String>,
}

impl HeaderMap {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a field to a header
    pub fn insert(&mut self, field: CanonicalField, header: impl Into<String>) {
        self.mapped.insert(field, header.into());
    }

    /// Header mapped to a field, if any
    pub fn header(&self, field: CanonicalField) -> Option<&str> {
        self.mapped.get(&field).map(|s| s.as_str())
    }

    /// Check whether a field was found in the file
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.mapped.contains_key(&field)
    }

    /// Project a raw row value through the map
    pub fn value<'a>(&self, row: &'a RawRow, field: CanonicalField) -> Option<&'a CellValue> {
        self.header(field).and_then(|h| row.get(h))
    }

    /// Fields that were not found in the file, in resolution order
    pub fn unmapped(&self) -> Vec<CanonicalField> {
        CanonicalField::all()
            .iter()
            .copied()
            .filter(|f| !self.mapped.contains_key(f))
            .collect()
    }

    /// Mapped (field, header) pairs in resolution order
    pub fn entries(&self) -> Vec<(CanonicalField, &str)> {
        CanonicalField::all()
            .iter()
            .filter_map(|f| self.mapped.get(f).map(|h| (*f, h.as_str())))
            .collect()
    }

    /// Number of mapped fields
    pub fn len(&self) -> usize {
        self.mapped.len()
    }

    /// Check if no field was mapped
    pub fn is_empty(&self) -> bool {
        self.mapped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_pairs_cells_with_headers() {
        let table = RawTable::from_rows(
            vec!["OT".to_string(), "".to_string(), "Cliente".to_string()],
            vec![vec![
                CellValue::from("OT-1"),
                CellValue::from("ignored"),
                CellValue::from("ACME"),
            ]],
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0].get("Cliente"), Some(&CellValue::from("ACME")));
    }

    #[test]
    fn test_repeated_header_keeps_first_column() {
        let table = RawTable::from_rows(
            vec!["OT".to_string(), "Monto".to_string(), "OT".to_string()],
            vec![vec![
                CellValue::from("OT-1"),
                CellValue::Number(1500.0),
                CellValue::from("OT-99"),
            ]],
        );

        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0].get("OT"), Some(&CellValue::from("OT-1")));
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in CanonicalField::all() {
            assert_eq!(CanonicalField::from_key(field.key()), Some(*field));
        }
        assert_eq!(CanonicalField::from_key("unknown"), None);
    }

    #[test]
    fn test_header_map_projection() {
        let mut map = HeaderMap::new();
        map.insert(CanonicalField::Client, "Cliente");

        let mut row = RawRow::new();
        row.insert("Cliente".to_string(), CellValue::from("ACME"));

        assert_eq!(
            map.value(&row, CanonicalField::Client),
            Some(&CellValue::from("ACME"))
        );
        assert_eq!(map.value(&row, CanonicalField::Identifier), None);
        assert!(map.unmapped().contains(&CanonicalField::Identifier));
    }
}
