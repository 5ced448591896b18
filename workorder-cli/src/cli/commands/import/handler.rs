//! Import command handler

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use colored::*;
use dialoguer::{Confirm, Select};
use is_terminal::IsTerminal;
use tokio::sync::mpsc;

use super::ImportCommands;
use super::report::{self, JsonReport};
use crate::cli::commands::prepare_from_file;
use crate::config::Config;
use crate::config::repository::SqliteWorkOrderStore;
use crate::config::repository::work_orders;
use crate::import::types::{DuplicateStrategy, ImportError};
use crate::import::{CommitConfig, CommitContext, CommitUpdate, commit};

/// Where the duplicate strategy came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyChoice {
    /// Decided without asking
    Decided(DuplicateStrategy),
    /// Ask the operator
    Prompt,
}

/// Pick the strategy: flag, then prompt when duplicates exist and a terminal is
/// attached, then config, then the default
pub fn choose_strategy(
    explicit: Option<DuplicateStrategy>,
    configured: Option<DuplicateStrategy>,
    has_duplicates: bool,
    interactive: bool,
) -> StrategyChoice {
    if let Some(strategy) = explicit {
        return StrategyChoice::Decided(strategy);
    }
    if has_duplicates && interactive {
        return StrategyChoice::Prompt;
    }
    StrategyChoice::Decided(configured.unwrap_or_default())
}

fn prompt_strategy(duplicates: usize, default: DuplicateStrategy) -> Result<DuplicateStrategy> {
    let variants = DuplicateStrategy::all_variants();
    let items: Vec<&str> = variants.iter().map(|s| s.label()).collect();
    let default_index = variants.iter().position(|s| *s == default).unwrap_or(0);

    let selection = Select::new()
        .with_prompt(format!("{} work orders already exist", duplicates))
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(variants[selection])
}

/// Handle the import command
pub async fn handle_import_command(args: ImportCommands, config: &Config) -> Result<()> {
    let (prepared, pool) = prepare_from_file(&args.file, args.sheet.as_deref(), config).await?;
    let interactive = !args.json && std::io::stdin().is_terminal();

    if !args.json {
        report::print_header_mapping(&prepared);
        report::print_validation(&prepared);
    }

    if !prepared.is_valid() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&JsonReport::checked(&prepared))?);
        }
        pool.close().await;
        return Err(ImportError::ValidationPending {
            error_count: prepared.row_errors.len(),
        }
        .into());
    }

    if !args.json {
        report::print_conflicts(&prepared);
    }

    let strategy = match choose_strategy(
        args.strategy,
        config.import.strategy,
        prepared.needs_strategy(),
        interactive,
    ) {
        StrategyChoice::Decided(strategy) => strategy,
        StrategyChoice::Prompt => prompt_strategy(
            prepared.batch.duplicate.len(),
            config.import.strategy.unwrap_or_default(),
        )?,
    };

    let operations = prepared.plan(strategy)?;
    if operations.is_empty() {
        log::info!("Nothing to import");
        if args.json {
            println!("{}", serde_json::to_string_pretty(&JsonReport::checked(&prepared))?);
        } else {
            println!("{}", "Nothing to import.".yellow());
        }
        pool.close().await;
        return Ok(());
    }

    if !args.json {
        report::print_plan(&operations, strategy);
    }

    if !args.yes {
        if !interactive {
            pool.close().await;
            anyhow::bail!("Refusing to import without confirmation; pass --yes");
        }
        let proceed = Confirm::new()
            .with_prompt(format!("Import {} work orders?", operations.len()))
            .default(false)
            .interact()?;
        if !proceed {
            println!("{}", "Import aborted.".yellow());
            pool.close().await;
            return Ok(());
        }
    }

    let commit_config = CommitConfig::builder()
        .workers_override(args.workers.or(config.import.workers))
        .build();

    let (update_tx, update_rx) = mpsc::channel(100);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let context = CommitContext::new(update_tx, cancel_flag.clone());

    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, finishing in-flight writes");
            cancel_flag.store(true, Ordering::Relaxed);
        }
    });

    let progress_task = tokio::spawn(print_progress(update_rx, !args.json));

    let store = Arc::new(SqliteWorkOrderStore::new(pool.clone()));
    let result = commit(operations, store, &commit_config, &context).await;

    // Closing the last sender ends the progress printer
    drop(context);
    signal_task.abort();
    let _ = progress_task.await;

    match work_orders::count(&pool).await {
        Ok(stored) => log::info!("Database holds {} work orders", stored),
        Err(e) => log::warn!("{:#}", e),
    }
    pool.close().await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonReport::committed(&prepared, strategy, &result))?
        );
    } else {
        report::print_result(&result);
    }

    if result.was_cancelled() {
        anyhow::bail!("Import cancelled; {} operations were not attempted", result.skipped_count);
    }
    if result.error_count > 0 {
        anyhow::bail!("{} of {} operations failed", result.error_count, result.total());
    }
    Ok(())
}

async fn print_progress(mut update_rx: mpsc::Receiver<CommitUpdate>, visible: bool) {
    while let Some(update) = update_rx.recv().await {
        match update {
            CommitUpdate::Started { total } => {
                log::info!("Committing {} operations", total);
            }
            CommitUpdate::Progress { processed, total } => {
                if visible && (processed == total || processed % 25 == 0) {
                    println!("  {}/{}", processed, total);
                }
            }
            CommitUpdate::Failed(failure) => {
                log::warn!("{}", failure);
            }
            CommitUpdate::Completed {
                success_count,
                error_count,
            } => {
                log::info!("Commit finished: {} ok, {} failed", success_count, error_count);
            }
            CommitUpdate::Cancelled { skipped } => {
                log::warn!("Commit cancelled, {} operations skipped", skipped);
            }
        }
    }
}
