//! Logs command - inspect the local event log
//!
//! Entries carry an event name (`session_demoted`, `wallet_refresh_failed`,
//! ...) and, for failures, the core error kind. Both can be filtered on.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::builder::PossibleValuesParser;
use colored::Colorize;
use dialoguer::Confirm;
use serde_json::json;

use super::get_chainbook_dir;
use crate::output;
use chainbook_core::{EntryPoint, Error, LogQuery, LoggingService};

#[derive(clap::Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only this event, e.g. session_demoted or wallet_refresh_failed
        #[arg(short, long)]
        event: Option<String>,
        /// Only failures of this error kind
        #[arg(short, long, value_parser = PossibleValuesParser::new(Error::KINDS))]
        kind: Option<String>,
        /// Show only failures
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear old log entries
    Clear {
        /// Delete logs older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u32,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show counts per event and per error kind
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn get_logging_service() -> Result<LoggingService> {
    let dir = get_chainbook_dir()?;
    std::fs::create_dir_all(&dir)?;
    LoggingService::new(&dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Unix-ms timestamp `days` before `now`
fn cutoff_ms(now: DateTime<Utc>, days: u32) -> Result<i64> {
    Duration::try_days(i64::from(days))
        .and_then(|age| now.checked_sub_signed(age))
        .map(|cutoff| cutoff.timestamp_millis())
        .ok_or_else(|| anyhow!("{} days is out of range", days))
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = get_logging_service()?;

    match command {
        LogsCommands::List {
            limit,
            event,
            kind,
            errors,
            json,
        } => {
            let entries = service.query(&LogQuery {
                event,
                error_kind: kind,
                errors_only: errors,
                limit,
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No matching log entries.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Event", "Where", "Error kind", "Details"]);

            for entry in entries {
                let context = entry.view.or(entry.command).unwrap_or_default();
                let event = if entry.error_message.is_some() {
                    entry.event.red().to_string()
                } else {
                    entry.event
                };

                table.add_row(vec![
                    format_timestamp(entry.timestamp),
                    event,
                    context,
                    entry.error_message.unwrap_or_default(),
                    entry.error_details.unwrap_or_default(),
                ]);
            }

            println!("{}", table);
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let cutoff = cutoff_ms(Utc::now(), older_than_days)?;

            if !force && !json {
                if !Confirm::new()
                    .with_prompt(format!("Delete logs older than {} days?", older_than_days))
                    .default(false)
                    .interact()?
                {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = service.delete_before(cutoff)?;

            if json {
                println!("{}", json!({ "deleted": deleted }));
            } else {
                println!("Deleted {} log entries", deleted);
            }
        }
        LogsCommands::Stats { json } => {
            let total = service.count()?;
            let events = service.event_counts()?;
            let kinds = service.error_kind_counts()?;
            let db_path = service.db_path().to_path_buf();

            if json {
                let kinds: serde_json::Map<_, _> = kinds
                    .into_iter()
                    .map(|(kind, count)| (kind, json!(count)))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "total_entries": total,
                        "events": events,
                        "error_kinds": kinds,
                        "database_path": db_path.to_string_lossy(),
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Log Statistics".bold());
            println!("  Total entries: {}", total);
            println!("  Database: {}", db_path.display());

            if !events.is_empty() {
                println!();
                let mut table = output::create_table();
                table.set_header(vec!["Event", "Count", "Failed"]);
                for count in &events {
                    table.add_row(vec![
                        count.event.clone(),
                        count.total.to_string(),
                        count.errors.to_string(),
                    ]);
                }
                println!("{}", table);
            }

            if !kinds.is_empty() {
                println!();
                let mut table = output::create_table();
                table.set_header(vec!["Error kind", "Count"]);
                for (kind, count) in &kinds {
                    table.add_row(vec![kind.clone(), count.to_string()]);
                }
                println!("{}", table);
            }
        }
    }

    Ok(())
}
