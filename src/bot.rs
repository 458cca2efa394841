//! Long-running Telegram bot: admin commands and channel post relay.

use crate::auth::AuthorizationGate;
use crate::commands::{Command, CommandDispatcher};
use crate::config::{is_placeholder_token, JsonFileStore, TOKEN_ENV_VAR};
use crate::policy::ContentPolicy;
use crate::registry::ChannelRegistry;
use crate::relay::RelayEngine;
use crate::telegram::{inbound_post, originator_id, TelegramForwarder};
use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tokio::sync::Mutex;

/// Handle an admin command sent as a message.
async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    commands: CommandDispatcher,
) -> ResponseResult<()> {
    let Some(originator) = originator_id(&msg) else {
        return Ok(());
    };

    if let Some(reply) = commands.dispatch(originator, cmd).await {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}

/// Handle a post published in a channel the bot can see.
async fn channel_post_handler(
    msg: Message,
    relay: RelayEngine,
    forwarder: TelegramForwarder,
) -> ResponseResult<()> {
    let post = inbound_post(&msg);
    relay.handle(&post, &forwarder).await;
    Ok(())
}

/// Main entry point for the bot.
pub async fn run(store: JsonFileStore) -> Result<()> {
    let config = store.load_or_init().with_context(|| {
        format!("Failed to load configuration from {}", store.path().display())
    })?;

    let token = config.resolve_token();
    if is_placeholder_token(&token) {
        anyhow::bail!(
            "Bot token not configured: edit {} or set {}",
            store.path().display(),
            TOKEN_ENV_VAR
        );
    }

    let gate = AuthorizationGate::new(config.admin_id);
    let registry = Arc::new(Mutex::new(ChannelRegistry::new(config, Box::new(store))));
    let commands = CommandDispatcher::new(registry.clone(), gate);
    let relay = RelayEngine::new(registry, ContentPolicy);

    let bot = Bot::new(token);
    let forwarder = TelegramForwarder::new(bot.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    tracing::info!("Starting channel relay bot...");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_channel_post().endpoint(channel_post_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![commands, relay, forwarder])
        .default_handler(|upd| async move {
            tracing::debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Update caused error",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
