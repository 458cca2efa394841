//! Channel relay bot - CLI entry point.

use anyhow::{Context, Result};
use channel_relay_bot::cli::{Cli, Commands};
use channel_relay_bot::config::{ConfigStore, JsonFileStore};
use channel_relay_bot::{bot, logging, ChannelRegistry};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let store = JsonFileStore::new(cli.config);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            bot::run(store).await.context("Failed to run relay bot")?;
        }
        Commands::Init => {
            store
                .load_or_init()
                .context("Failed to initialize configuration")?;
            println!("Configuration: {}", store.path().display());
        }
        Commands::Status => {
            print_status(store);
        }
    }

    Ok(())
}

/// Print configuration status.
fn print_status(store: JsonFileStore) {
    println!("Channel Relay Bot Status\n");

    let path = store.path().display().to_string();
    match store.load() {
        Ok(config) => {
            println!("Configuration: {}", path);
            println!(
                "   Token: {}",
                if config.has_placeholder_token() {
                    "Not configured"
                } else {
                    "Configured"
                }
            );
            println!("   Admin ID: {}", config.admin_id);
            println!("   Target: {}", config.target_channel);

            let registry = ChannelRegistry::new(config, Box::new(store));
            if registry.list().is_empty() {
                println!("   Sources: none");
            } else {
                println!("   Sources:");
                for channel in registry.list() {
                    println!("   - {}", channel);
                }
            }
        }
        Err(e) => {
            println!("Configuration: Not found or invalid");
            println!("   Error: {}", e);
            println!();
            println!("Run 'channel-relay-bot init' to create {}", path);
        }
    }
}
