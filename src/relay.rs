//! Relay decision engine.
//!
//! Decides, for every inbound channel post, whether it is forwarded to the
//! target channel. Forward failures are logged and swallowed so one bad post
//! never stops the update loop.

use crate::error::RelayError;
use crate::policy::{AttachmentKind, ContentPolicy};
use crate::registry::ChannelRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A channel post as seen by the relay, already decoded from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundPost {
    /// Numeric id of the originating chat
    pub chat_id: i64,
    /// Public username of the originating chat, without `@`
    pub chat_username: Option<String>,
    /// Message id inside the originating chat
    pub message_id: i32,
    /// Whether the post is a bot command
    pub is_command: bool,
    /// Attachments carried by the post
    pub attachments: Vec<AttachmentKind>,
}

impl InboundPost {
    /// `@username` form of the originating chat, if it has one.
    pub fn username_identifier(&self) -> Option<String> {
        self.chat_username.as_ref().map(|u| format!("@{}", u))
    }

    /// Numeric form of the originating chat.
    pub fn id_identifier(&self) -> String {
        self.chat_id.to_string()
    }

    /// Preferred identifier for log lines.
    pub fn source_label(&self) -> String {
        self.username_identifier()
            .unwrap_or_else(|| self.id_identifier())
    }
}

/// Why a post was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnmonitoredSource,
    NoMedia,
    Command,
}

/// Terminal state of one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Ignored(IgnoreReason),
    Forwarded,
    ForwardFailed,
}

/// Outbound forward capability.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Forward `post` unchanged to `target` (`@name` or numeric chat id).
    async fn forward(&self, post: &InboundPost, target: &str) -> Result<(), RelayError>;
}

/// Composes registry membership and the content policy.
#[derive(Clone)]
pub struct RelayEngine {
    registry: Arc<Mutex<ChannelRegistry>>,
    policy: ContentPolicy,
}

impl RelayEngine {
    pub fn new(registry: Arc<Mutex<ChannelRegistry>>, policy: ContentPolicy) -> Self {
        Self { registry, policy }
    }

    /// Run one post through the relay.
    ///
    /// The registry lock is released before the network call.
    pub async fn handle(&self, post: &InboundPost, forwarder: &dyn Forwarder) -> RelayOutcome {
        let source = post.source_label();

        if post.is_command {
            tracing::debug!("Ignoring command posted in {}", source);
            return RelayOutcome::Ignored(IgnoreReason::Command);
        }

        let target = {
            let registry = self.registry.lock().await;
            let monitored = post
                .username_identifier()
                .is_some_and(|u| registry.contains(&u))
                || registry.contains(&post.id_identifier());

            if !monitored {
                tracing::debug!("Message from non-monitored channel: {}", source);
                return RelayOutcome::Ignored(IgnoreReason::UnmonitoredSource);
            }
            registry.target_channel().to_string()
        };

        if !self.policy.qualifies(&post.attachments) {
            tracing::info!("Skipping plain text message from {}", source);
            return RelayOutcome::Ignored(IgnoreReason::NoMedia);
        }

        match forwarder.forward(post, &target).await {
            Ok(()) => {
                tracing::info!("Message with media forwarded from {} to {}", source, target);
                RelayOutcome::Forwarded
            }
            Err(e) => {
                tracing::error!("Error forwarding message from {} to {}: {}", source, target, e);
                RelayOutcome::ForwardFailed
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::registry::tests::{fixture, MemoryStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Records forward calls; fails while `fail` is set.
    #[derive(Default)]
    pub(crate) struct RecordingForwarder {
        pub calls: StdMutex<Vec<(i64, i32, String)>>,
        pub fail: AtomicBool,
    }

    #[async_trait]
    impl Forwarder for RecordingForwarder {
        async fn forward(&self, post: &InboundPost, target: &str) -> Result<(), RelayError> {
            self.calls
                .lock()
                .unwrap()
                .push((post.chat_id, post.message_id, target.to_string()));
            if self.fail.load(Ordering::SeqCst) {
                return Err(RelayError::InvalidTarget(target.to_string()));
            }
            Ok(())
        }
    }

    fn engine(channels: &[&str]) -> RelayEngine {
        let registry = ChannelRegistry::new(fixture(channels), Box::new(MemoryStore::default()));
        RelayEngine::new(Arc::new(Mutex::new(registry)), ContentPolicy)
    }

    fn post(username: Option<&str>, attachments: &[AttachmentKind]) -> InboundPost {
        InboundPost {
            chat_id: -1001234567890,
            chat_username: username.map(str::to_string),
            message_id: 7,
            is_command: false,
            attachments: attachments.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_photo_from_monitored_channel_is_forwarded_once() {
        let engine = engine(&["@news"]);
        let forwarder = RecordingForwarder::default();

        let outcome = engine
            .handle(&post(Some("news"), &[AttachmentKind::Photo]), &forwarder)
            .await;

        assert_eq!(outcome, RelayOutcome::Forwarded);
        assert_eq!(
            *forwarder.calls.lock().unwrap(),
            vec![(-1001234567890, 7, "@target".to_string())]
        );
    }

    #[tokio::test]
    async fn test_text_only_post_is_not_forwarded() {
        let engine = engine(&["@news"]);
        let forwarder = RecordingForwarder::default();

        let outcome = engine.handle(&post(Some("news"), &[]), &forwarder).await;

        assert_eq!(outcome, RelayOutcome::Ignored(IgnoreReason::NoMedia));
        assert!(forwarder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unmonitored_channel_is_ignored() {
        let engine = engine(&["@news"]);
        let forwarder = RecordingForwarder::default();

        let outcome = engine
            .handle(&post(Some("other"), &[AttachmentKind::Video]), &forwarder)
            .await;

        assert_eq!(outcome, RelayOutcome::Ignored(IgnoreReason::UnmonitoredSource));
        assert!(forwarder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_numeric_id_matches_even_with_username() {
        let engine = engine(&["-1001234567890"]);
        let forwarder = RecordingForwarder::default();

        let outcome = engine
            .handle(&post(Some("news"), &[AttachmentKind::Document]), &forwarder)
            .await;

        assert_eq!(outcome, RelayOutcome::Forwarded);
    }

    #[tokio::test]
    async fn test_username_entry_misses_post_without_username() {
        let engine = engine(&["@news"]);
        let forwarder = RecordingForwarder::default();

        let outcome = engine
            .handle(&post(None, &[AttachmentKind::Photo]), &forwarder)
            .await;

        assert_eq!(outcome, RelayOutcome::Ignored(IgnoreReason::UnmonitoredSource));
    }

    #[tokio::test]
    async fn test_commands_are_never_relayed() {
        let engine = engine(&["@news"]);
        let forwarder = RecordingForwarder::default();
        let mut command = post(Some("news"), &[AttachmentKind::Photo]);
        command.is_command = true;

        let outcome = engine.handle(&command, &forwarder).await;

        assert_eq!(outcome, RelayOutcome::Ignored(IgnoreReason::Command));
        assert!(forwarder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forward_failure_does_not_stop_next_post() {
        let engine = engine(&["@news"]);
        let forwarder = RecordingForwarder::default();
        forwarder.fail.store(true, Ordering::SeqCst);

        let first = engine
            .handle(&post(Some("news"), &[AttachmentKind::Photo]), &forwarder)
            .await;
        assert_eq!(first, RelayOutcome::ForwardFailed);

        forwarder.fail.store(false, Ordering::SeqCst);
        let second = engine
            .handle(&post(Some("news"), &[AttachmentKind::Photo]), &forwarder)
            .await;
        assert_eq!(second, RelayOutcome::Forwarded);
        assert_eq!(forwarder.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_no_attachments_never_forwarded_regardless_of_source() {
        let forwarder = RecordingForwarder::default();
        for channels in [&["@news"][..], &[][..], &["-1001234567890"][..]] {
            let engine = engine(channels);
            engine.handle(&post(Some("news"), &[]), &forwarder).await;
        }
        assert!(forwarder.calls.lock().unwrap().is_empty());
    }
}
