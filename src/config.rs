//! Configuration document and its on-disk store.
//!
//! The document is a flat JSON object:
//!
//! ```json
//! {
//!   "token": "YOUR_BOT_TOKEN",
//!   "admin_id": 123456789,
//!   "target_channel": "@your_target_channel",
//!   "source_channels": []
//! }
//! ```
//!
//! A missing file is replaced with a default document; a malformed one is
//! reported and never silently recovered.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default document location, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Placeholder token written into a freshly created document.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN";

/// Placeholder admin id written into a freshly created document.
pub const PLACEHOLDER_ADMIN_ID: i64 = 123456789;

/// Placeholder target written into a freshly created document.
pub const PLACEHOLDER_TARGET: &str = "@your_target_channel";

/// Environment variable that overrides the document's token.
pub const TOKEN_ENV_VAR: &str = "RELAY_BOT_TOKEN";

/// Default document path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Whether `token` is missing or still the first-run placeholder.
pub fn is_placeholder_token(token: &str) -> bool {
    let token = token.trim();
    token.is_empty() || token == PLACEHOLDER_TOKEN
}

/// The persisted configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Bot API token, only used by the transport
    pub token: String,
    /// The single identity allowed to run commands
    pub admin_id: i64,
    /// Destination channel, `@name` or numeric chat id
    pub target_channel: String,
    /// Monitored channels in insertion order
    pub source_channels: Vec<String>,
    /// Keys this program does not know about, kept as-is across saves
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: PLACEHOLDER_TOKEN.to_string(),
            admin_id: PLACEHOLDER_ADMIN_ID,
            target_channel: PLACEHOLDER_TARGET.to_string(),
            source_channels: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Config {
    /// Whether the token is still the first-run placeholder.
    pub fn has_placeholder_token(&self) -> bool {
        is_placeholder_token(&self.token)
    }

    /// Token to hand to the transport.
    ///
    /// `RELAY_BOT_TOKEN` (from the environment or a `.env` file in the
    /// working directory) wins over the document. The override is never
    /// written back.
    pub fn resolve_token(&self) -> String {
        let _ = dotenvy::dotenv();
        match env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => token,
            _ => self.token.clone(),
        }
    }
}

/// Durable storage for the configuration document.
pub trait ConfigStore: Send + Sync {
    /// Read the document. Fails with [`ConfigError::NotFound`] when absent.
    fn load(&self) -> Result<Config, ConfigError>;

    /// Overwrite storage with the full document.
    fn save(&self, config: &Config) -> Result<(), ConfigError>;
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the given path, or `config.json` when `None`.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(default_config_path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, materializing the default one on first run.
    ///
    /// Only a missing file is recovered from; malformed JSON and other I/O
    /// failures are returned to the caller.
    pub fn load_or_init(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound(path)) => {
                tracing::warn!(
                    "Configuration file {} not found, creating a default one",
                    path.display()
                );
                let config = Config::default();
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                self.save(&config)?;
                Ok(config)
            }
            other => other,
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Config, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Write to a sibling temp file, then rename over the target.
    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(config)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        tracing::info!("Configuration saved to {}", self.path.display());
        Ok(())
    }
}
