//! Content policy: which posts are worth relaying.

use std::fmt;

/// Attachment kinds that make a post eligible for relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Photo,
    Video,
    Document,
    Audio,
    Animation,
    Sticker,
    Voice,
    VideoNote,
    Contact,
    Location,
    Venue,
    Poll,
    Dice,
    Game,
    Invoice,
    SuccessfulPayment,
}

impl AttachmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photo",
            AttachmentKind::Video => "video",
            AttachmentKind::Document => "document",
            AttachmentKind::Audio => "audio",
            AttachmentKind::Animation => "animation",
            AttachmentKind::Sticker => "sticker",
            AttachmentKind::Voice => "voice",
            AttachmentKind::VideoNote => "video_note",
            AttachmentKind::Contact => "contact",
            AttachmentKind::Location => "location",
            AttachmentKind::Venue => "venue",
            AttachmentKind::Poll => "poll",
            AttachmentKind::Dice => "dice",
            AttachmentKind::Game => "game",
            AttachmentKind::Invoice => "invoice",
            AttachmentKind::SuccessfulPayment => "successful_payment",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless media filter.
///
/// A post qualifies when it carries at least one [`AttachmentKind`]. Text
/// alone never qualifies, however long.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentPolicy;

impl ContentPolicy {
    pub fn qualifies(&self, attachments: &[AttachmentKind]) -> bool {
        !attachments.is_empty()
    }
}
