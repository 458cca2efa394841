//! Admin command surface.
//!
//! [`CommandDispatcher::dispatch`] returns the reply to send, or `None` when
//! nothing must be sent. Non-admin callers always get `None`: silence is the
//! contract, not an omission.

use crate::auth::AuthorizationGate;
use crate::registry::{AddOutcome, ChannelRegistry, RemoveOutcome};
use std::sync::Arc;
use teloxide::utils::command::{BotCommands, ParseError};
use tokio::sync::Mutex;

/// Available bot commands.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show the welcome message")]
    Start,
    #[command(description = "Show this help message")]
    Help,
    #[command(
        description = "Add a channel to forward messages from",
        parse_with = channel_args
    )]
    AddChannel(Vec<String>),
    #[command(
        description = "Remove a channel from the list",
        parse_with = channel_args
    )]
    RemoveChannel(Vec<String>),
    #[command(description = "Show all channels being monitored")]
    ListChannels,
}

/// Keep every whitespace-separated argument so arity is checked after the
/// authorization gate, not by the parser.
fn channel_args(input: String) -> Result<(Vec<String>,), ParseError> {
    Ok((input.split_whitespace().map(str::to_string).collect(),))
}

const START_TEXT: &str = "Welcome to the Channel Forwarding Bot!\n\n\
    Use /help to see available commands.";

const HELP_TEXT: &str = "Available commands:\n\n\
    /add_channel CHANNEL_ID - Add a channel to forward messages from\n\
    /remove_channel CHANNEL_ID - Remove a channel from the list\n\
    /list_channels - Show all channels being monitored\n\
    /help - Show this help message";

const NO_CHANNELS_TEXT: &str = "No channels are currently being monitored.";

fn usage(command: &str) -> String {
    format!(
        "Please provide a channel ID or username.\n\
        Example: /{0} @channel_name or /{0} -1001234567890",
        command
    )
}

/// Maps admin commands onto registry operations.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<Mutex<ChannelRegistry>>,
    gate: AuthorizationGate,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<Mutex<ChannelRegistry>>, gate: AuthorizationGate) -> Self {
        Self { registry, gate }
    }

    /// Handle `command` sent by `originator_id`.
    pub async fn dispatch(&self, originator_id: i64, command: Command) -> Option<String> {
        if !self.gate.authorize(originator_id) {
            tracing::debug!("Ignoring command from unauthorized user {}", originator_id);
            return None;
        }

        let reply = match command {
            Command::Start => START_TEXT.to_string(),
            Command::Help => HELP_TEXT.to_string(),
            Command::AddChannel(args) => match single_arg(&args) {
                Some(channel) => self.add_channel(channel).await,
                None => usage("add_channel"),
            },
            Command::RemoveChannel(args) => match single_arg(&args) {
                Some(channel) => self.remove_channel(channel).await,
                None => usage("remove_channel"),
            },
            Command::ListChannels => self.list_channels().await,
        };

        Some(reply)
    }

    async fn add_channel(&self, channel: &str) -> String {
        let mut registry = self.registry.lock().await;
        match registry.add(channel) {
            Ok(AddOutcome::Added) => format!("Channel {} added successfully.", channel),
            Ok(AddOutcome::AlreadyPresent) => {
                format!("Channel {} is already in the list.", channel)
            }
            Err(e) => {
                tracing::error!("Failed to save configuration after adding {}: {}", channel, e);
                format!(
                    "Failed to save configuration; channel {} was not added.",
                    channel
                )
            }
        }
    }

    async fn remove_channel(&self, channel: &str) -> String {
        let mut registry = self.registry.lock().await;
        match registry.remove(channel) {
            Ok(RemoveOutcome::Removed) => format!("Channel {} removed successfully.", channel),
            Ok(RemoveOutcome::NotPresent) => format!("Channel {} is not in the list.", channel),
            Err(e) => {
                tracing::error!(
                    "Failed to save configuration after removing {}: {}",
                    channel,
                    e
                );
                format!(
                    "Failed to save configuration; channel {} was not removed.",
                    channel
                )
            }
        }
    }

    async fn list_channels(&self) -> String {
        let registry = self.registry.lock().await;
        let channels = registry.list();
        if channels.is_empty() {
            return NO_CHANNELS_TEXT.to_string();
        }

        let lines: Vec<String> = channels.iter().map(|c| format!("- {}", c)).collect();
        format!(
            "Currently monitoring the following channels:\n\n{}",
            lines.join("\n")
        )
    }
}

fn single_arg(args: &[String]) -> Option<&str> {
    match args {
        [only] => Some(only.as_str()),
        _ => None,
    }
}
