//! Config command - show and change settings.json

use anyhow::{bail, Result};
use colored::Colorize;
use serde::Serialize;

use super::get_chainbook_dir;
use crate::output;
use chainbook_core::config::{Config, API_URL_ENV};

#[derive(clap::Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        /// Watchlist server base URL
        #[arg(long)]
        api_url: Option<String>,
        /// Request timeout in seconds (0 waits indefinitely)
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Keep the stored token when the server is unreachable
        #[arg(long)]
        retain_token_on_network_error: Option<bool>,
    },
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    api_url: &'a str,
    request_timeout_secs: Option<u64>,
    retain_token_on_network_error: bool,
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let dir = get_chainbook_dir()?;
    let mut config = Config::load(&dir)?;

    match command {
        ConfigCommands::Show { json } => {
            let report = ConfigReport {
                api_url: &config.api_url,
                request_timeout_secs: config.request_timeout.map(|d| d.as_secs()),
                retain_token_on_network_error: config.retain_token_on_network_error,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            let timeout = report
                .request_timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "none".to_string());
            let mut table = output::create_table();
            table.add_row(vec!["Server", report.api_url]);
            table.add_row(vec!["Request timeout", timeout.as_str()]);
            table.add_row(vec![
                "Keep token when offline",
                if report.retain_token_on_network_error { "yes" } else { "no" },
            ]);
            println!("{}", table);
            println!("{}", format!("Settings: {}", dir.join("settings.json").display()).dimmed());
        }
        ConfigCommands::Set {
            api_url,
            timeout_secs,
            retain_token_on_network_error,
        } => {
            if api_url.is_none() && timeout_secs.is_none() && retain_token_on_network_error.is_none() {
                bail!("Nothing to set. See `cb config set --help`.");
            }

            if let Some(url) = api_url {
                config.set_api_url(&url)?;
                if std::env::var(API_URL_ENV).is_ok() {
                    output::warning(&format!("{} is set and overrides the saved URL", API_URL_ENV));
                }
            }
            if let Some(secs) = timeout_secs {
                config.set_request_timeout_secs(secs);
            }
            if let Some(retain) = retain_token_on_network_error {
                config.retain_token_on_network_error = retain;
            }

            std::fs::create_dir_all(&dir)?;
            config.save(&dir)?;
            output::success("Settings saved");
        }
    }

    Ok(())
}
