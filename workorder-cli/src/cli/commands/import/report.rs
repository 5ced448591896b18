//! Operator-facing reports for the three import stages

use colored::*;
use serde::Serialize;

use crate::import::types::{DuplicateStrategy, ImportOperation, ImportResult, OperationKind, RowError};
use crate::import::{ImportSummary, PreparedImport};

/// Rows of validation errors printed before truncating
const MAX_ERRORS_SHOWN: usize = 50;

/// Stage 1: which column feeds which field
pub fn print_header_mapping(prepared: &PreparedImport) {
    println!("{}", "Columns".bold());
    for (field, header) in prepared.header_map.entries() {
        println!("  {:<16} <- {}", field.label(), header.cyan());
    }

    let unmapped = prepared.header_map.unmapped();
    if !unmapped.is_empty() {
        let names: Vec<&str> = unmapped.iter().map(|f| f.label()).collect();
        println!("  {} {}", "not found:".dimmed(), names.join(", ").dimmed());
    }
    println!();
}

/// Stage 2: validation outcome
pub fn print_validation(prepared: &PreparedImport) {
    println!("{}", "Validation".bold());
    println!(
        "  {} rows read, {} valid, {} with errors",
        prepared.total_rows,
        prepared.valid_rows.to_string().green(),
        colored_count(prepared.invalid_rows(), Color::Red)
    );

    print_errors(&prepared.row_errors);

    for repeated in &prepared.batch.repeated {
        println!("  {} {}", "!".yellow(), repeated);
    }
    println!();
}

fn print_errors(errors: &[RowError]) {
    for error in errors.iter().take(MAX_ERRORS_SHOWN) {
        println!("  {} {}", "x".red(), error);
    }
    if errors.len() > MAX_ERRORS_SHOWN {
        println!(
            "  {}",
            format!("... and {} more", errors.len() - MAX_ERRORS_SHOWN).dimmed()
        );
    }
}

/// Stage 3: new vs. duplicate
pub fn print_conflicts(prepared: &PreparedImport) {
    let batch = &prepared.batch;
    println!("{}", "Conflicts".bold());
    println!(
        "  {} new, {} already exist",
        batch.new.len().to_string().green(),
        colored_count(batch.duplicate.len(), Color::Yellow)
    );

    if batch.has_duplicates() {
        let preview: Vec<&str> = batch.duplicate_identifiers().into_iter().take(10).collect();
        let more = batch.duplicate.len().saturating_sub(preview.len());
        let suffix = if more > 0 { format!(" (+{})", more) } else { String::new() };
        println!("  existing: {}{}", preview.join(", ").yellow(), suffix);
    }
    println!();
}

/// Operations about to be committed
pub fn print_plan(operations: &[ImportOperation], strategy: DuplicateStrategy) {
    let creates = operations
        .iter()
        .filter(|op| op.kind() == OperationKind::Create)
        .count();
    let updates = operations.len() - creates;
    println!(
        "Strategy {}: {} to create, {} to update",
        strategy.to_string().cyan(),
        creates,
        updates
    );
}

/// Final tally
pub fn print_result(result: &ImportResult) {
    println!();
    println!("{}", "Result".bold());
    println!("  {} {}", "imported:".green(), result.success_count);
    if result.is_complete_success() {
        return;
    }
    if result.error_count > 0 {
        println!("  {} {}", "failed:".red(), result.error_count);
        for message in result.messages() {
            println!("  {} {}", "x".red(), message);
        }
    }
    if result.skipped_count > 0 {
        println!(
            "  {} {} (cancelled)",
            "not attempted:".yellow(),
            result.skipped_count
        );
    }
}

fn colored_count(count: usize, color: Color) -> ColoredString {
    if count == 0 {
        count.to_string().normal()
    } else {
        count.to_string().color(color)
    }
}

/// Machine-readable report
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub summary: ImportSummary,
    pub errors: &'a [RowError],
    pub repeated: Vec<String>,
    pub new: Vec<&'a str>,
    pub duplicates: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DuplicateStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a ImportResult>,
}

impl<'a> JsonReport<'a> {
    /// Report for a run that stopped before committing
    pub fn checked(prepared: &'a PreparedImport) -> Self {
        JsonReport {
            summary: prepared.summary(),
            errors: &prepared.row_errors,
            repeated: prepared.batch.repeated.iter().map(|r| r.to_string()).collect(),
            new: prepared.batch.new_identifiers(),
            duplicates: prepared.batch.duplicate_identifiers(),
            strategy: None,
            result: None,
        }
    }

    /// Report for a committed run
    pub fn committed(
        prepared: &'a PreparedImport,
        strategy: DuplicateStrategy,
        result: &'a ImportResult,
    ) -> Self {
        JsonReport {
            strategy: Some(strategy),
            result: Some(result),
            ..Self::checked(prepared)
        }
    }
}
