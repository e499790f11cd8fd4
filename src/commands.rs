use std::fmt::Write as _;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use crate::calendar;
use crate::inventory::{self, ParseOutcome};
use crate::refunds::{self, DEADLINE_CUTOFF};

fn inventory_report(outcome: &ParseOutcome) -> String {
    let mut out = String::new();
    match outcome {
        ParseOutcome::Error { errors_by_line } => {
            let _ = writeln!(out, "Lines with errors:");
            for e in errors_by_line {
                let _ = writeln!(out, "  Línea {}: {}", e.line, e.text);
            }
        }
        ParseOutcome::Success { products } if products.is_empty() => {
            let _ = writeln!(out, "No records found.");
        }
        ParseOutcome::Success { products } => {
            for p in products {
                let _ = writeln!(
                    out,
                    "{} (Total: {})",
                    p.product,
                    inventory::units(p.total_quantity())
                );
                for group in p.locations() {
                    let _ = writeln!(out, "  - {}", group.describe());
                }
            }
        }
    }
    out
}

/// Parses an inventory log file and prints the per-product summary.
pub fn run_inventory(path: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let outcome = inventory::parse_log(&raw)
        .with_context(|| format!("Rejected {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", inventory_report(&outcome));
    }

    match &outcome {
        ParseOutcome::Error { errors_by_line } => {
            bail!("{} line(s) could not be parsed", errors_by_line.len())
        }
        ParseOutcome::Success { products } => {
            info!("Parsed {} products from {}", products.len(), path.display());
            Ok(())
        }
    }
}

/// Prints the refund deadline for an activity date and resolution days.
pub fn run_deadline(date: &str, days: &str) -> Result<()> {
    let activity_date = calendar::parse_dmy_lenient(date.trim())
        .with_context(|| format!("Invalid activity date '{}'", date))?;
    let days = refunds::parse_resolution_days(days.trim())
        .map_err(|e| anyhow!("Invalid resolution days '{}': {}", days, e))?;

    let deadline = refunds::compute_deadline(activity_date, days);
    println!(
        "Deadline: {} {} ({} working days after {})",
        deadline.display_date(),
        DEADLINE_CUTOFF,
        days.whole_days(),
        calendar::format_dmy(activity_date)
    );
    if deadline.fractional_hours > 0.0 {
        info!(
            "{:.1} extra hours are not applied to the deadline date",
            deadline.fractional_hours
        );
    }
    Ok(())
}
