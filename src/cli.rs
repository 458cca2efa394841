//! CLI argument parsing with subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Relay media posts from monitored Telegram channels to a target channel.
#[derive(Parser)]
#[command(name = "channel-relay-bot")]
#[command(about = "Relay media posts from monitored Telegram channels to a target channel")]
#[command(version)]
pub struct Cli {
    /// Path to the JSON configuration document
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot until interrupted (default)
    Run,

    /// Create the default configuration document if it does not exist
    Init,

    /// Show current configuration status
    Status,
}
