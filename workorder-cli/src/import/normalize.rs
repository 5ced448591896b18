//! Row normalization and validation
//!
//! Each raw row is projected through the header map and turned into either a
//! [`WorkOrderDraft`] or the list of problems that prevent it. Rows are
//! independent; nothing here looks at other rows or at existing records.

use crate::import::dates::{format_iso, normalize_date};
use crate::import::types::{
    CanonicalField, CellValue, HeaderMap, InvoiceLine, RawRow, RowError, WorkOrderDraft,
    WorkOrderStatus, display_row,
};
use crate::services::matching::{MatchOutcome, NameIndex, normalize_name};

/// Keyword prefixes of legacy statuses meaning the order is closed
const CLOSED_PREFIXES: &[&str] = &[
    "facturad", "terminad", "finalizad", "cerrad", "completad", "entregad",
];

/// Phrases of legacy statuses meaning work is underway
const IN_PROGRESS_PHRASES: &[&str] = &["en proceso", "en curso"];

const CANCELLED_PREFIXES: &[&str] = &["anulad", "cancelad"];

/// Values of the invoiced column that count as yes
const TRUTHY: &[&str] = &["si", "x", "yes", "true", "1"];

/// Normalize one data row.
///
/// `index` is the 0-based position of the row in the table; errors report the
/// spreadsheet row number (`index + 2`). A missing or unparsable start date
/// yields exactly one error and stops further checks.
pub fn normalize_row(
    index: usize,
    raw: &RawRow,
    header_map: &HeaderMap,
    collaborators: &NameIndex,
    services: &NameIndex,
) -> Result<WorkOrderDraft, Vec<RowError>> {
    let row = display_row(index);
    let value = |field| header_map.value(raw, field);
    let text = |field| value(field).map(CellValue::to_text).unwrap_or_default();

    let start_date = match value(CanonicalField::StartDate) {
        Some(cell) if !cell.is_blank() => match normalize_date(cell) {
            Some(date) => date,
            None => {
                return Err(vec![RowError::field(
                    row,
                    CanonicalField::StartDate,
                    format!("invalid start date '{}'", cell.to_text()),
                )]);
            }
        },
        _ => {
            return Err(vec![RowError::field(
                row,
                CanonicalField::StartDate,
                "missing start date",
            )]);
        }
    };

    let end_date = match value(CanonicalField::EndDate) {
        Some(cell) if !cell.is_blank() => {
            let parsed = normalize_date(cell);
            if parsed.is_none() {
                log::debug!("Row {}: ignoring unparsable end date '{}'", row, cell.to_text());
            }
            parsed
        }
        _ => None,
    };

    let identifier = text(CanonicalField::Identifier);

    let mut errors = Vec::new();
    if identifier.is_empty() {
        errors.push(RowError::field(row, CanonicalField::Identifier, "missing identifier"));
    }
    if let Some(end) = end_date {
        if end < start_date {
            errors.push(RowError::field(
                row,
                CanonicalField::EndDate,
                format!(
                    "end date {} is before start date {}",
                    format_iso(end),
                    format_iso(start_date)
                ),
            ));
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut draft = WorkOrderDraft::new(row, identifier, start_date);
    draft.end_date = end_date;
    draft.description = text(CanonicalField::Description);
    draft.client = text(CanonicalField::Client);

    draft.price = match value(CanonicalField::Price) {
        Some(cell) => coerce_price(cell),
        None => 0.0,
    };
    if draft.price == 0.0 {
        if let Some(cell) = value(CanonicalField::Price).filter(|c| !c.is_blank()) {
            log::debug!("Row {}: price '{}' defaulted to 0", row, cell.to_text());
        }
    }

    draft.status = derive_status(
        value(CanonicalField::LegacyStatus),
        value(CanonicalField::Invoiced),
    );

    draft.technicians = resolve_list(row, collaborators, &text(CanonicalField::Technicians));
    draft.supervisors = resolve_list(row, collaborators, &text(CanonicalField::Supervisors));

    let salesperson = text(CanonicalField::Salesperson);
    if !salesperson.is_empty() {
        draft.salesperson = resolved(row, collaborators, collaborators.match_name_info(&salesperson));
    }

    let service = text(CanonicalField::Service);
    if !service.is_empty() {
        draft.service = resolved(row, services, services.match_exact_info(&service));
    }

    let invoice_number = text(CanonicalField::InvoiceNumber);
    if !invoice_number.is_empty() {
        match value(CanonicalField::InvoiceDate).and_then(normalize_date) {
            Some(date) => draft.invoices.push(InvoiceLine {
                number: invoice_number,
                date,
                amount: draft.price,
            }),
            None => log::debug!(
                "Row {}: invoice '{}' has no usable date, skipping invoice line",
                row,
                invoice_number
            ),
        }
    }

    Ok(draft)
}

fn resolve_list(row: usize, registry: &NameIndex, input: &str) -> Vec<String> {
    registry
        .match_list_info(input)
        .into_iter()
        .map(|outcome| resolved(row, registry, outcome))
        .collect()
}

fn resolved(row: usize, registry: &NameIndex, outcome: MatchOutcome) -> String {
    if !outcome.is_canonical() && !registry.is_empty() {
        log::warn!("Row {}: no registry entry for '{}', keeping as written", row, outcome.value());
    }
    outcome.into_value()
}

/// Coerce a price cell into a non-negative amount.
///
/// Text keeps only digits, `,`, `.` and `-`. With both separators present,
/// the right-most one is the decimal mark. With one kind only, it separates
/// thousands when it repeats, or when it is a single dot followed by exactly
/// three digits. Anything unparsable or negative becomes 0.
pub fn coerce_price(value: &CellValue) -> f64 {
    let amount = match value {
        CellValue::Number(n) => *n,
        CellValue::String(s) => parse_amount(s).unwrap_or(0.0),
        CellValue::Empty | CellValue::Bool(_) | CellValue::Date(_) => 0.0,
    };

    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if kept.is_empty() {
        return None;
    }

    let canonical = match (kept.rfind(','), kept.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => kept.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => kept.replace(',', ""),
        (Some(_), None) if kept.matches(',').count() > 1 => kept.replace(',', ""),
        (Some(_), None) => kept.replace(',', "."),
        (None, Some(_)) => {
            let thousands = match kept.matches('.').count() {
                1 => kept
                    .split_once('.')
                    .map(|(_, frac)| frac.len() == 3)
                    .unwrap_or(false),
                _ => true,
            };
            if thousands { kept.replace('.', "") } else { kept }
        }
        (None, None) => kept,
    };

    let amount = canonical.parse::<f64>().ok();
    if amount.is_none() {
        log::debug!("Unparsable amount '{}' read as '{}'", text, canonical);
    }
    amount
}

/// Derive the status from the legacy status text and the invoiced flag.
///
/// Keyword matching is accent and case insensitive. A row still considered
/// not started but flagged as invoiced is closed.
pub fn derive_status(legacy: Option<&CellValue>, invoiced: Option<&CellValue>) -> WorkOrderStatus {
    let status = legacy
        .map(|cell| status_from_text(&cell.to_text()))
        .unwrap_or_default();

    if status == WorkOrderStatus::NotStarted && invoiced.is_some_and(is_truthy) {
        return WorkOrderStatus::Closed;
    }
    status
}

fn status_from_text(text: &str) -> WorkOrderStatus {
    let normalized = normalize_name(text);
    let words: Vec<&str> = normalized.split(' ').collect();
    let has_prefix = |prefixes: &[&str]| {
        words
            .iter()
            .any(|w| prefixes.iter().any(|p| w.starts_with(p)))
    };

    if has_prefix(CLOSED_PREFIXES) {
        WorkOrderStatus::Closed
    } else if IN_PROGRESS_PHRASES.iter().any(|p| normalized.contains(p))
        || words.contains(&"proceso")
        || has_prefix(&["iniciad"])
    {
        WorkOrderStatus::InProgress
    } else if has_prefix(CANCELLED_PREFIXES) {
        WorkOrderStatus::Cancelled
    } else {
        WorkOrderStatus::NotStarted
    }
}

fn is_truthy(cell: &CellValue) -> bool {
    match cell {
        CellValue::Bool(b) => *b,
        other => TRUTHY.contains(&normalize_name(&other.to_text()).as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::headers::{HeaderAliases, resolve_headers};
    use chrono::NaiveDate;

    const HEADERS: &[&str] = &[
        "N° OT",
        "Fecha Ingreso",
        "Nombre del Proyecto",
        "Cliente",
        "Vendedor",
        "Superv",
        "Técnico",
        "Sistema",
        "Monto Neto",
        "FactProc",
        "Facturado",
        "Fact.N",
        "Fecha Fact",
        "Fecha Término",
    ];

    fn header_map() -> HeaderMap {
        let headers: Vec<String> = HEADERS.iter().map(|s| s.to_string()).collect();
        resolve_headers(&headers, &HeaderAliases::default())
    }

    fn raw(cells: &[(&str, CellValue)]) -> RawRow {
        cells
            .iter()
            .map(|(h, v)| (h.to_string(), v.clone()))
            .collect()
    }

    fn s(text: &str) -> CellValue {
        CellValue::String(text.to_string())
    }

    fn collaborators() -> NameIndex {
        NameIndex::new(["Juan Pérez", "María González", "Pedro Soto"])
    }

    fn services() -> NameIndex {
        NameIndex::new(["Mantención", "Climatización"])
    }

    fn normalize(index: usize, row: &RawRow) -> Result<WorkOrderDraft, Vec<RowError>> {
        normalize_row(index, row, &header_map(), &collaborators(), &services())
    }

    #[test]
    fn test_full_row_normalizes() {
        let row = raw(&[
            ("N° OT", s(" OT-2024-001 ")),
            ("Fecha Ingreso", CellValue::Number(45000.0)),
            ("Nombre del Proyecto", s("Cambio de equipos")),
            ("Cliente", s("ACME S.A.")),
            ("Vendedor", s("gonzalez")),
            ("Superv", s("pedro")),
            ("Técnico", s("juan perez; Maria Gonzalez")),
            ("Sistema", s("mantencion")),
            ("Monto Neto", s("$1.234,50")),
            ("FactProc", s("Facturado")),
            ("Fact.N", CellValue::Number(1024.0)),
            ("Fecha Fact", s("20/03/2023")),
            ("Fecha Término", s("31/03/2023")),
        ]);

        let draft = normalize(0, &row).unwrap();
        assert_eq!(draft.row, 2);
        assert_eq!(draft.identifier, "OT-2024-001");
        assert_eq!(draft.start_date_iso(), "2023-03-15");
        assert_eq!(draft.end_date_iso(), "2023-03-31");
        assert_eq!(draft.description, "Cambio de equipos");
        assert_eq!(draft.client, "ACME S.A.");
        assert_eq!(draft.salesperson, "María González");
        assert_eq!(draft.supervisors, vec!["Pedro Soto"]);
        assert_eq!(draft.technicians, vec!["Juan Pérez", "María González"]);
        assert_eq!(draft.service, "Mantención");
        assert_eq!(draft.price, 1234.5);
        assert_eq!(draft.status, WorkOrderStatus::Closed);
        assert_eq!(
            draft.invoices,
            vec![InvoiceLine {
                number: "1024".to_string(),
                date: NaiveDate::from_ymd_opt(2023, 3, 20).unwrap(),
                amount: 1234.5,
            }]
        );
    }

    #[test]
    fn test_invalid_start_date_single_error() {
        let row = raw(&[("N° OT", s("")), ("Fecha Ingreso", s("abc"))]);

        let errors = normalize(3, &row).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Row 5: invalid start date 'abc'");
    }

    #[test]
    fn test_missing_start_date() {
        let row = raw(&[("N° OT", s("OT-1"))]);

        let errors = normalize(0, &row).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "missing start date");
        assert_eq!(errors[0].field, CanonicalField::StartDate);
    }

    #[test]
    fn test_schema_errors_collected() {
        let row = raw(&[
            ("N° OT", s("   ")),
            ("Fecha Ingreso", s("10/05/2024")),
            ("Fecha Término", s("01/05/2024")),
        ]);

        let errors = normalize(0, &row).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, CanonicalField::Identifier);
        assert_eq!(
            errors[1].message,
            "end date 2024-05-01 is before start date 2024-05-10"
        );
    }

    #[test]
    fn test_unparsable_end_date_left_empty() {
        let row = raw(&[
            ("N° OT", s("OT-9")),
            ("Fecha Ingreso", s("10/05/2024")),
            ("Fecha Término", s("pendiente")),
        ]);

        let draft = normalize(0, &row).unwrap();
        assert_eq!(draft.end_date, None);
    }

    #[test]
    fn test_unmatched_references_kept_as_written() {
        let row = raw(&[
            ("N° OT", s("OT-9")),
            ("Fecha Ingreso", s("10/05/2024")),
            ("Técnico", s("Nadie Conocido")),
            ("Sistema", s("Mantención Preventiva")),
        ]);

        let draft = normalize(0, &row).unwrap();
        assert_eq!(draft.technicians, vec!["Nadie Conocido"]);
        assert_eq!(draft.service, "Mantención Preventiva");
        assert_eq!(draft.salesperson, "");
    }

    #[test]
    fn test_invoice_without_date_is_dropped() {
        let row = raw(&[
            ("N° OT", s("OT-9")),
            ("Fecha Ingreso", s("10/05/2024")),
            ("Fact.N", s("F-77")),
        ]);

        assert!(normalize(0, &row).unwrap().invoices.is_empty());
    }

    #[test]
    fn test_coerce_price() {
        assert_eq!(coerce_price(&s("$1.234,50")), 1234.5);
        assert_eq!(coerce_price(&s("abc")), 0.0);
        assert_eq!(coerce_price(&s("1.234.567")), 1234567.0);
        assert_eq!(coerce_price(&s("1.500")), 1500.0);
        assert_eq!(coerce_price(&s("12.5")), 12.5);
        assert_eq!(coerce_price(&s("1234,5")), 1234.5);
        assert_eq!(coerce_price(&s("1,234.50")), 1234.5);
        assert_eq!(coerce_price(&s("US$ 12,345,678.9")), 12345678.9);
        assert_eq!(coerce_price(&s("1,234,567")), 1234567.0);
        assert_eq!(coerce_price(&s("1.234.567,89")), 1234567.89);
        assert_eq!(coerce_price(&s("-500")), 0.0);
        assert_eq!(coerce_price(&CellValue::Number(990.0)), 990.0);
        assert_eq!(coerce_price(&CellValue::Number(-1.0)), 0.0);
        assert_eq!(coerce_price(&CellValue::Number(f64::INFINITY)), 0.0);
        assert_eq!(coerce_price(&CellValue::Empty), 0.0);
    }

    #[test]
    fn test_derive_status_keywords() {
        let status = |text: &str| derive_status(Some(&s(text)), None);

        assert_eq!(status("Facturado"), WorkOrderStatus::Closed);
        assert_eq!(status("TERMINADA"), WorkOrderStatus::Closed);
        assert_eq!(status("En proceso"), WorkOrderStatus::InProgress);
        assert_eq!(status("en curso"), WorkOrderStatus::InProgress);
        assert_eq!(status("Iniciado"), WorkOrderStatus::InProgress);
        assert_eq!(status("Anulada"), WorkOrderStatus::Cancelled);
        assert_eq!(status(""), WorkOrderStatus::NotStarted);
        assert_eq!(status("otro"), WorkOrderStatus::NotStarted);
        assert_eq!(derive_status(None, None), WorkOrderStatus::NotStarted);
    }

    #[test]
    fn test_invoiced_flag_upgrades_not_started() {
        assert_eq!(
            derive_status(None, Some(&s("Sí"))),
            WorkOrderStatus::Closed
        );
        assert_eq!(
            derive_status(Some(&s("")), Some(&CellValue::Bool(true))),
            WorkOrderStatus::Closed
        );
        assert_eq!(
            derive_status(None, Some(&CellValue::Number(1.0))),
            WorkOrderStatus::Closed
        );
        // only upgrades rows that are not started
        assert_eq!(
            derive_status(Some(&s("En proceso")), Some(&s("x"))),
            WorkOrderStatus::InProgress
        );
        assert_eq!(
            derive_status(None, Some(&s("no"))),
            WorkOrderStatus::NotStarted
        );
    }
}
