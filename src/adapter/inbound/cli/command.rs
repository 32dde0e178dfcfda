//! Command-line interface definitions.
//!
//! `paprika-bot` with no subcommand runs the bot; `check` validates the
//! configuration and the database without connecting to Telegram.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Telegram bot for CoinPaprika prices and price alerts
#[derive(Parser, Debug)]
#[command(name = "paprika-bot")]
#[command(version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default)
    Run,
    /// Validate configuration, secrets and database
    Check,
}

impl Cli {
    /// The subcommand to execute, defaulting to `run`.
    #[must_use]
    pub fn subcommand(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}
