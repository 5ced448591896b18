//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::config::Config;
use commands::check::{CheckCommands, handle_check_command};
use commands::import::{ImportCommands, handle_import_command};
use commands::registry::{RegistryCommands, handle_registry_command};
use commands::show::{ShowCommands, handle_show_command};

/// Import work orders from spreadsheets
#[derive(Debug, Parser)]
#[command(name = "workorder-cli", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every command
#[derive(Debug, Clone, clap::Args)]
pub struct GlobalArgs {
    /// SQLite database file (overrides config and WORKORDER_DATABASE)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Configuration file (default: <config_dir>/workorder-cli/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a spreadsheet and report duplicates without writing anything
    Check(CheckCommands),
    /// Validate, resolve duplicates and import a spreadsheet
    Import(ImportCommands),
    /// Print a stored work order
    Show(ShowCommands),
    /// Manage the canonical collaborator and service names used for matching
    #[command(subcommand)]
    Registry(RegistryCommands),
}

impl GlobalArgs {
    /// Log level filter implied by the verbosity count
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Load the configuration, letting `--db` win over everything else
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(db) = &self.db {
            config.database = Some(db.clone());
        }
        Ok(config)
    }
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    if cli.global.no_color {
        colored::control::set_override(false);
    }

    let config = cli.global.load_config()?;

    match cli.command {
        Commands::Check(args) => handle_check_command(args, &config).await,
        Commands::Import(args) => handle_import_command(args, &config).await,
        Commands::Show(args) => handle_show_command(args, &config).await,
        Commands::Registry(command) => handle_registry_command(command, &config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::types::DuplicateStrategy;

    #[test]
    fn test_parse_import_command() {
        let cli = Cli::try_parse_from([
            "workorder-cli",
            "-vv",
            "import",
            "orders.xlsx",
            "--strategy",
            "replace-duplicates",
            "--workers",
            "4",
            "--yes",
            "--db",
            "/tmp/wo.db",
        ])
        .unwrap();

        assert_eq!(cli.global.log_level(), log::LevelFilter::Debug);
        assert_eq!(cli.global.db, Some(PathBuf::from("/tmp/wo.db")));
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.file, PathBuf::from("orders.xlsx"));
                assert_eq!(args.strategy, Some(DuplicateStrategy::ReplaceDuplicates));
                assert_eq!(args.workers, Some(4));
                assert!(args.yes);
                assert!(!args.json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = Cli::try_parse_from(["workorder-cli", "import", "a.csv", "--strategy", "merge"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_registry_command() {
        let cli = Cli::try_parse_from([
            "workorder-cli",
            "registry",
            "add-collaborator",
            "Juan Pérez",
            "Ana Soto",
        ])
        .unwrap();
        match cli.command {
            Commands::Registry(RegistryCommands::AddCollaborator { names }) => {
                assert_eq!(names, vec!["Juan Pérez", "Ana Soto"]);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["workorder-cli", "registry", "add-service"]).is_err());
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from(["workorder-cli", "check", "a.xlsx", "--sheet", "2024"]).unwrap();
        assert_eq!(cli.global.log_level(), log::LevelFilter::Warn);
        match cli.command {
            Commands::Check(args) => assert_eq!(args.sheet.as_deref(), Some("2024")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
