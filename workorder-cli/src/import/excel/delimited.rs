//! Delimited text decoding via the csv crate

use std::path::Path;

use crate::import::types::{CellValue, ImportError, RawTable};

/// Read a delimited text file
pub fn read_delimited(path: &Path) -> Result<RawTable, ImportError> {
    let source = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ImportError::Decode {
        path: source.clone(),
        message: e.to_string(),
    })?;
    parse_delimited(&content, &source)
}

/// Parse delimited text already in memory. The delimiter (`,` or `;`) is the
/// one appearing more often in the header line; `source` names the input in
/// error messages.
pub fn parse_delimited(content: &str, source: &str) -> Result<RawTable, ImportError> {
    let decode_error = |message: String| ImportError::Decode {
        path: source.to_string(),
        message,
    };

    let content = content.trim_start_matches('\u{feff}');
    let first_line = content.lines().next().unwrap_or_default();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(first_line))
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| decode_error(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| decode_error(format!("line {}: {}", index + 2, e)))?;
        let cells: Vec<CellValue> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::String(field.to_string())
                }
            })
            .collect();
        if !cells.iter().all(CellValue::is_blank) {
            rows.push(cells);
        }
    }

    if rows.is_empty() {
        return Err(ImportError::EmptyTable);
    }

    log::info!("Read {} data rows from {}", rows.len(), source);
    Ok(RawTable::from_rows(headers, rows))
}

fn detect_delimiter(header_line: &str) -> u8 {
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();
    if semicolons > commas { b';' } else { b',' }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        let table = parse_delimited("N° OT,Fecha Ingreso\nOT-1,15/03/2023\n,\nOT-2,\n", "test").unwrap();

        assert_eq!(table.headers, vec!["N° OT", "Fecha Ingreso"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("N° OT"), Some(&CellValue::from("OT-1")));
        assert_eq!(table.rows[1].get("Fecha Ingreso"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_parse_semicolon_separated_with_bom() {
        let table = parse_delimited("\u{feff}OT;Monto Neto\nOT-1;1.234,50\n", "test").unwrap();

        assert_eq!(table.headers, vec!["OT", "Monto Neto"]);
        assert_eq!(table.rows[0].get("Monto Neto"), Some(&CellValue::from("1.234,50")));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let err = parse_delimited("OT,Fecha Ingreso\n", "test").unwrap_err();
        assert_eq!(err, ImportError::EmptyTable);
    }

    #[test]
    fn test_read_from_disk() {
        let path = std::env::temp_dir().join(format!("workorders-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, "OT,Fecha Ingreso\nOT-7,2024-01-01\n").unwrap();

        let table = read_delimited(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = read_delimited(Path::new("/nonexistent/orders.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Decode { .. }));
    }
}
