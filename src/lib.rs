//! Channel relay bot library.
//!
//! Watches a set of source Telegram channels and forwards their media posts to
//! a single target channel. An admin manages the source list with chat
//! commands; the list is persisted in a JSON document.

pub mod auth;
pub mod bot;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod policy;
pub mod registry;
pub mod relay;
pub mod telegram;

// Re-export commonly used types
pub use auth::AuthorizationGate;
pub use commands::{Command, CommandDispatcher};
pub use config::{Config, ConfigStore, JsonFileStore};
pub use policy::{AttachmentKind, ContentPolicy};
pub use registry::{AddOutcome, ChannelRegistry, RemoveOutcome};
pub use relay::{Forwarder, IgnoreReason, InboundPost, RelayEngine, RelayOutcome};
