//! Telegram transport glue.
//!
//! Decodes teloxide messages into [`InboundPost`]s and implements
//! [`Forwarder`] on top of the Bot API `forwardMessage` call.

use crate::error::RelayError;
use crate::policy::AttachmentKind;
use crate::relay::{Forwarder, InboundPost};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, Recipient};

/// Forwards posts with the Bot API.
#[derive(Clone)]
pub struct TelegramForwarder {
    bot: Bot,
}

impl TelegramForwarder {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Forwarder for TelegramForwarder {
    async fn forward(&self, post: &InboundPost, target: &str) -> Result<(), RelayError> {
        let recipient = parse_recipient(target)?;
        self.bot
            .forward_message(recipient, ChatId(post.chat_id), MessageId(post.message_id))
            .await?;
        Ok(())
    }
}

/// Parse a target channel given as `@name` or a numeric chat id.
pub fn parse_recipient(target: &str) -> Result<Recipient, RelayError> {
    let target = target.trim();
    if let Ok(id) = target.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(id)));
    }
    if target.len() > 1 && target.starts_with('@') {
        return Ok(Recipient::ChannelUsername(target.to_string()));
    }
    Err(RelayError::InvalidTarget(target.to_string()))
}

/// Decode a channel post.
pub fn inbound_post(msg: &Message) -> InboundPost {
    InboundPost {
        chat_id: msg.chat.id.0,
        chat_username: msg.chat.username().map(str::to_string),
        message_id: msg.id.0,
        is_command: msg.text().is_some_and(|t| t.starts_with('/')),
        attachments: attachment_kinds(msg),
    }
}

/// Telegram user id of the sender, if the message has a user sender.
pub fn originator_id(msg: &Message) -> Option<i64> {
    // teloxide uses u64 for user ids; the document stores i64.
    msg.from.as_ref().and_then(|user| i64::try_from(user.id.0).ok())
}

/// Every relay-worthy attachment carried by `msg`.
pub fn attachment_kinds(msg: &Message) -> Vec<AttachmentKind> {
    let probes = [
        (msg.photo().is_some(), AttachmentKind::Photo),
        (msg.video().is_some(), AttachmentKind::Video),
        (msg.document().is_some(), AttachmentKind::Document),
        (msg.audio().is_some(), AttachmentKind::Audio),
        (msg.animation().is_some(), AttachmentKind::Animation),
        (msg.sticker().is_some(), AttachmentKind::Sticker),
        (msg.voice().is_some(), AttachmentKind::Voice),
        (msg.video_note().is_some(), AttachmentKind::VideoNote),
        (msg.contact().is_some(), AttachmentKind::Contact),
        (msg.location().is_some(), AttachmentKind::Location),
        (msg.venue().is_some(), AttachmentKind::Venue),
        (msg.poll().is_some(), AttachmentKind::Poll),
        (msg.dice().is_some(), AttachmentKind::Dice),
        (msg.game().is_some(), AttachmentKind::Game),
        (msg.invoice().is_some(), AttachmentKind::Invoice),
        (
            msg.successful_payment().is_some(),
            AttachmentKind::SuccessfulPayment,
        ),
    ];

    probes
        .into_iter()
        .filter_map(|(present, kind)| present.then_some(kind))
        .collect()
}
