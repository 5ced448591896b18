//! Spreadsheet decoding into raw tables
//!
//! Row 1 holds the headers. Cells under blank headers and fully blank data
//! rows are dropped.

mod delimited;
mod reader;

pub use delimited::{parse_delimited, read_delimited};
pub use reader::{cell_value, read_workbook};

use std::path::Path;

use crate::import::types::{ImportError, RawTable};

/// Decode a spreadsheet file. `.csv`/`.txt` files are read as delimited
/// text; everything else goes through the workbook reader.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<RawTable, ImportError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    log::debug!("Decoding {} (extension '{}')", path.display(), extension);

    match extension.as_str() {
        "csv" | "txt" => {
            if let Some(sheet) = sheet {
                log::warn!("Ignoring sheet '{}' for delimited file", sheet);
            }
            read_delimited(path)
        }
        _ => read_workbook(path, sheet),
    }
}
