//! `import` command: validate, resolve duplicates, commit

pub mod handler;
pub mod report;

use std::path::PathBuf;

use clap::Args;

use crate::import::types::DuplicateStrategy;

pub use handler::handle_import_command;

#[derive(Debug, Args)]
pub struct ImportCommands {
    /// Spreadsheet to import (.xlsx, .xls, .ods or .csv)
    pub file: PathBuf,

    /// Sheet to read (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// What to do with rows whose identifier already exists
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<DuplicateStrategy>,

    /// Concurrent writes (default: 1, from config when set)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the report as JSON (implies no prompts; requires --yes to commit)
    #[arg(long)]
    pub json: bool,
}
