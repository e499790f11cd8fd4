mod calendar;
mod commands;
mod config;
mod inventory;
mod models;
mod refunds;
mod reservations;
mod web;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Sports facility desk: activity reservations, inventory logs and refunds.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web forms server
    Serve {
        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,

        /// Listen address (e.g. "0.0.0.0:3000")
        #[arg(short = 'a', long, default_value = "0.0.0.0:3009")]
        addr: String,
    },

    /// Parse an inventory log file (one `product#aisle#shelf#quantity` per line)
    Inventory {
        /// Log file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the structured result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute a refund resolution deadline
    ///
    /// Examples:
    ///   deadline 12/03/2025 2     -> 14/03/2025 09:00
    ///   deadline 14/03/2025 1.5   -> 17/03/2025 09:00
    Deadline {
        /// Activity date (dd/mm/yyyy)
        #[arg(value_name = "DATE")]
        date: String,

        /// Working days for resolution (0.5 to 10.0, one decimal)
        #[arg(value_name = "DAYS")]
        days: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Serve { config, addr } => {
            let cfg = config::load_config(config)?;
            web::serve(cfg, addr).await?;
        }
        Command::Inventory { file, json } => {
            commands::run_inventory(file, *json)?;
        }
        Command::Deadline { date, days } => {
            commands::run_deadline(date, days)?;
        }
    }

    Ok(())
}
