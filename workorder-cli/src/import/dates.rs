//! Date normalization for heterogeneous spreadsheet cells
//!
//! Cells may hold native dates, spreadsheet serial numbers, or free text in
//! a handful of day-first and ISO layouts. Everything is reduced to a naive
//! calendar date; no timezone conversion happens anywhere.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::import::types::CellValue;
use crate::services::matching::strip_accents;

/// Serial of 1970-01-01 in the 1900 date system
const UNIX_EPOCH_SERIAL: i64 = 25569;

/// Years accepted from any source, so every result re-parses from its ISO form
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2200;

/// Date-only layouts, tried in order
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%y", "%d-%m-%y",
    "%m/%d/%Y",
];

/// Date-time layouts, tried after the date-only ones
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// A period written as a range of years ("2023-2024", "2023/24")
static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}\s*[-/]\s*\d{2,4}$").expect("valid year range regex"));

/// Placeholders used in place of a date
const PLACEHOLDERS: &[&str] = &["-", "s/f", "sf", "sin fecha", "n/a", "na", "pendiente"];

/// Convert a spreadsheet serial number to a calendar date.
///
/// Fractions (time of day) are dropped. Returns `None` for non-finite or
/// out-of-range serials.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    if days.abs() > 3_000_000.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    epoch.checked_add_signed(Duration::days(days as i64 - UNIX_EPOCH_SERIAL))
}

/// Render a date as `YYYY-MM-DD`
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Normalize a cell into a calendar date, or `None` if it holds no date.
///
/// Cascade, first success wins:
/// 1. native date cells keep their calendar date,
/// 2. numbers greater than 1 are spreadsheet serials,
/// 3. text is checked against placeholder values, treated as a serial when
///    purely numeric, then parsed against the known layouts.
///
/// Results outside `MIN_YEAR..=MAX_YEAR` are rejected whatever their source.
pub fn normalize_date(value: &CellValue) -> Option<NaiveDate> {
    let date = match value {
        CellValue::Date(dt) => Some(dt.date()),
        CellValue::Number(n) => number_to_date(*n),
        CellValue::String(s) => parse_date_text(s),
        CellValue::Empty | CellValue::Bool(_) => None,
    };
    date.filter(|d| in_window(*d))
}

fn number_to_date(n: f64) -> Option<NaiveDate> {
    if n.is_finite() && n > 1.0 {
        serial_to_date(n)
    } else {
        None
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() || is_placeholder(text) {
        return None;
    }

    if let Ok(n) = text.parse::<f64>() {
        return number_to_date(n);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            if in_window(date) {
                return Some(date);
            }
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            if in_window(dt.date()) {
                return Some(dt.date());
            }
        }
    }

    // Offset is ignored; the calendar date as written is kept
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_local().date())
}

fn is_placeholder(text: &str) -> bool {
    if YEAR_RANGE.is_match(text) {
        return true;
    }
    let folded = strip_accents(text).to_lowercase();
    PLACEHOLDERS.contains(&folded.trim())
}

/// chrono's `%Y` happily parses "23" as year 23, so a layout only matches
/// when the year falls inside the window
fn in_window(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}
