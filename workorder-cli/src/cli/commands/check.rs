//! `check` command: validation and duplicate report only

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::import::report;
use super::prepare_from_file;
use crate::config::Config;
use crate::import::types::ImportError;

#[derive(Debug, Args)]
pub struct CheckCommands {
    /// Spreadsheet to check (.xlsx, .xls, .ods or .csv)
    pub file: PathBuf,

    /// Sheet to read (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the check command
pub async fn handle_check_command(args: CheckCommands, config: &Config) -> Result<()> {
    let (prepared, pool) = prepare_from_file(&args.file, args.sheet.as_deref(), config).await?;
    pool.close().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report::JsonReport::checked(&prepared))?);
    } else {
        report::print_header_mapping(&prepared);
        report::print_validation(&prepared);
        report::print_conflicts(&prepared);
    }

    if !prepared.is_valid() {
        return Err(ImportError::ValidationPending {
            error_count: prepared.row_errors.len(),
        }
        .into());
    }
    Ok(())
}
