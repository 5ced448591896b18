//! `show` command: print a stored work order

use anyhow::Result;
use clap::Args;
use colored::*;

use super::open_database;
use crate::config::Config;
use crate::config::repository::work_orders::{self, StoredWorkOrder};

#[derive(Debug, Args)]
pub struct ShowCommands {
    /// Work-order identifier
    pub identifier: String,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the show command
pub async fn handle_show_command(args: ShowCommands, config: &Config) -> Result<()> {
    let pool = open_database(config).await?;
    let found = work_orders::find_by_identifier(&pool, &args.identifier).await;
    pool.close().await;

    let Some(stored) = found? else {
        anyhow::bail!("No work order with identifier '{}'", args.identifier.trim());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
    } else {
        print_work_order(&stored);
    }
    Ok(())
}

fn print_work_order(stored: &StoredWorkOrder) {
    let draft = &stored.draft;
    println!("{} {}", draft.identifier.bold(), stored.id.dimmed());
    println!("  status:      {}", draft.status);
    println!("  start:       {}", draft.start_date_iso());
    if draft.end_date.is_some() {
        println!("  end:         {}", draft.end_date_iso());
    }
    println!("  client:      {}", draft.client);
    println!("  description: {}", draft.description);
    println!("  service:     {}", draft.service);
    println!("  salesperson: {}", draft.salesperson);
    println!("  technicians: {}", draft.technicians.join(", "));
    println!("  supervisors: {}", draft.supervisors.join(", "));
    println!("  price:       {:.2}", draft.price);
    for invoice in &draft.invoices {
        println!(
            "  invoice:     {} ({}) {:.2}",
            invoice.number,
            invoice.date.format("%Y-%m-%d"),
            invoice.amount
        );
    }
}
