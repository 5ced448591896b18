//! Workbook decoding via calamine (.xlsx, .xlsm, .xls, .ods)

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::import::dates::serial_to_date;
use crate::import::types::{CellValue, ImportError, RawTable};

/// Read the named sheet (or the first one) of a workbook
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable, ImportError> {
    let decode_error = |message: String| ImportError::Decode {
        path: path.display().to_string(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| decode_error(e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| decode_error("workbook has no sheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| decode_error(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Err(ImportError::EmptyTable),
    };

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|cells| !cells.iter().all(CellValue::is_blank))
        .collect();

    log::info!(
        "Read {} data rows from sheet '{}' of {}",
        data.len(),
        sheet_name,
        path.display()
    );

    Ok(RawTable::from_rows(headers, data))
}

fn header_text(cell: &Data) -> String {
    cell_value(cell).to_text()
}

/// Convert a calamine cell into the engine's cell value
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        // Time-only cells (serial <= 1) carry no calendar day
        Data::DateTime(dt) if dt.as_f64() <= 1.0 => CellValue::Number(dt.as_f64()),
        Data::DateTime(dt) => match serial_to_date(dt.as_f64()) {
            Some(date) => CellValue::Date(date.and_time(chrono::NaiveTime::MIN)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::dates::{format_iso, normalize_date};
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_cell_value_mapping() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_value(&Data::String("  ".into())), CellValue::Empty);
        assert_eq!(cell_value(&Data::String("OT-1".into())), CellValue::from("OT-1"));
        assert_eq!(cell_value(&Data::Int(1024)), CellValue::Number(1024.0));
        assert_eq!(cell_value(&Data::Float(12.5)), CellValue::Number(12.5));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(cell_value(&Data::Error(CellErrorType::NA)), CellValue::Empty);
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-02-01T00:00:00".into())),
            CellValue::from("2024-02-01T00:00:00")
        );
    }

    #[test]
    fn test_time_only_cell_is_not_a_date() {
        let time_only = Data::DateTime(ExcelDateTime::new(0.5, ExcelDateTimeType::TimeDelta, false));
        let value = cell_value(&time_only);
        assert_eq!(value, CellValue::Number(0.5));
        assert_eq!(normalize_date(&value), None);

        let stamped = Data::DateTime(ExcelDateTime::new(45000.25, ExcelDateTimeType::DateTime, false));
        let date = normalize_date(&cell_value(&stamped)).unwrap();
        assert_eq!(format_iso(date), "2023-03-15");
        assert_eq!(normalize_date(&CellValue::String(format_iso(date))), Some(date));
    }

    #[test]
    fn test_header_text_renders_numbers() {
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
        assert_eq!(header_text(&Data::String(" N° OT ".into())), "N° OT");
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = read_workbook(Path::new("/nonexistent/orders.xlsx"), None).unwrap_err();
        assert!(matches!(err, ImportError::Decode { .. }));
    }
}
