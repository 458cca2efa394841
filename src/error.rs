//! Error types for the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to loading and saving the configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid JSON in configuration file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while forwarding a post to the target channel.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Telegram error: {0}")]
    Forward(#[from] teloxide::RequestError),

    #[error("Invalid target channel: {0}")]
    InvalidTarget(String),
}
