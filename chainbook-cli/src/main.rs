//! Chainbook CLI - wallet watchlist in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{add, config, delete, list, login, logout, logs, register, status};

/// Chainbook - track and classify blockchain wallets
#[derive(Parser)]
#[command(name = "cb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the watchlist server
    Login {
        /// Account email
        #[arg(long)]
        email: Option<String>,
        /// Account password (prompted if omitted)
        #[arg(long, env = "CHAINBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        /// Account email
        #[arg(long)]
        email: Option<String>,
        /// Account password (prompted if omitted)
        #[arg(long, env = "CHAINBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show session status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List watched wallets
    List {
        /// Case-insensitive match on label or address
        #[arg(short, long)]
        query: Option<String>,
        /// Risk level to show (all, low, medium, high)
        #[arg(short, long, default_value = "all")]
        risk: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a wallet to the watchlist
    Add {
        /// Display label
        #[arg(long)]
        label: Option<String>,
        /// On-chain address
        #[arg(long)]
        address: Option<String>,
        /// Chain name (Ethereum, Solana, Bitcoin, Arbitrum, ...)
        #[arg(long)]
        chain: Option<String>,
        /// Risk level (low, medium, high)
        #[arg(long)]
        risk: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a wallet from the watchlist
    Delete {
        /// Wallet ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password } => login::run(email, password).await,
        Commands::Register { email, password } => register::run(email, password).await,
        Commands::Logout => logout::run().await,
        Commands::Status { json } => status::run(json).await,
        Commands::List { query, risk, json } => list::run(query, &risk, json).await,
        Commands::Add {
            label,
            address,
            chain,
            risk,
            notes,
        } => add::run(label, address, chain, risk, notes).await,
        Commands::Delete { id, force } => delete::run(id, force).await,
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
