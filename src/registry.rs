//! Registry of monitored source channels.
//!
//! Owns the configuration document and writes it back through a
//! [`ConfigStore`] after every change. A change that cannot be persisted is
//! rolled back, so memory and storage never disagree.

use crate::config::{Config, ConfigStore};
use crate::error::ConfigError;

/// Result of [`ChannelRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Result of [`ChannelRegistry::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
}

/// Ordered, duplicate-free set of source channel identifiers.
///
/// Identifiers are compared as plain strings: `@news` and `-1001234567890`
/// are different entries even when they name the same channel.
pub struct ChannelRegistry {
    config: Config,
    store: Box<dyn ConfigStore>,
}

impl ChannelRegistry {
    /// Build a registry from an already loaded document.
    ///
    /// Duplicates in a hand-edited document are dropped, keeping the first
    /// occurrence. Nothing is written until the next mutation.
    pub fn new(mut config: Config, store: Box<dyn ConfigStore>) -> Self {
        let mut seen = Vec::with_capacity(config.source_channels.len());
        config.source_channels.retain(|c| {
            if seen.contains(c) {
                tracing::warn!("Ignoring duplicate source channel {} in configuration", c);
                false
            } else {
                seen.push(c.clone());
                true
            }
        });
        Self { config, store }
    }

    /// Append `channel` unless it is already monitored.
    pub fn add(&mut self, channel: &str) -> Result<AddOutcome, ConfigError> {
        if self.contains(channel) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        self.config.source_channels.push(channel.to_string());
        if let Err(e) = self.store.save(&self.config) {
            self.config.source_channels.pop();
            return Err(e);
        }

        tracing::info!("Added source channel {}", channel);
        Ok(AddOutcome::Added)
    }

    /// Stop monitoring `channel`.
    pub fn remove(&mut self, channel: &str) -> Result<RemoveOutcome, ConfigError> {
        let Some(index) = self.position(channel) else {
            return Ok(RemoveOutcome::NotPresent);
        };

        let removed = self.config.source_channels.remove(index);
        if let Err(e) = self.store.save(&self.config) {
            self.config.source_channels.insert(index, removed);
            return Err(e);
        }

        tracing::info!("Removed source channel {}", channel);
        Ok(RemoveOutcome::Removed)
    }

    /// Monitored channels in insertion order.
    pub fn list(&self) -> &[String] {
        &self.config.source_channels
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.position(channel).is_some()
    }

    pub fn admin_id(&self) -> i64 {
        self.config.admin_id
    }

    pub fn target_channel(&self) -> &str {
        &self.config.target_channel
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn position(&self, channel: &str) -> Option<usize> {
        self.config.source_channels.iter().position(|c| c == channel)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::JsonFileStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// In-memory store that can be told to fail.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryStore {
        pub saved: Arc<Mutex<Option<Config>>>,
        pub fail: Arc<AtomicBool>,
    }

    impl ConfigStore for MemoryStore {
        fn load(&self) -> Result<Config, ConfigError> {
            self.saved
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ConfigError::NotFound("memory".into()))
        }

        fn save(&self, config: &Config) -> Result<(), ConfigError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ConfigError::Io(std::io::Error::other("disk full")));
            }
            *self.saved.lock().unwrap() = Some(config.clone());
            Ok(())
        }
    }

    pub(crate) fn fixture(channels: &[&str]) -> Config {
        Config {
            token: "token".to_string(),
            admin_id: 42,
            target_channel: "@target".to_string(),
            source_channels: channels.iter().map(|c| c.to_string()).collect(),
            ..Config::default()
        }
    }

    fn registry(channels: &[&str]) -> (ChannelRegistry, MemoryStore) {
        let store = MemoryStore::default();
        let registry = ChannelRegistry::new(fixture(channels), Box::new(store.clone()));
        (registry, store)
    }

    #[test]
    fn test_add_persists() {
        let (mut registry, store) = registry(&[]);

        assert_eq!(registry.add("@news").unwrap(), AddOutcome::Added);
        assert_eq!(registry.list(), ["@news"]);
        assert_eq!(store.load().unwrap().source_channels, ["@news"]);
    }

    #[test]
    fn test_add_twice_is_idempotent() {
        let (mut registry, _) = registry(&[]);

        registry.add("@news").unwrap();
        assert_eq!(registry.add("@news").unwrap(), AddOutcome::AlreadyPresent);
        assert_eq!(registry.list(), ["@news"]);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let (mut registry, _) = registry(&["@b"]);

        registry.add("@a").unwrap();
        registry.add("-100123").unwrap();
        assert_eq!(registry.list(), ["@b", "@a", "-100123"]);
    }

    #[test]
    fn test_add_then_remove_restores_state() {
        let (mut registry, store) = registry(&["@a", "@b"]);
        let before = registry.config().clone();

        registry.add("@news").unwrap();
        assert_eq!(registry.remove("@news").unwrap(), RemoveOutcome::Removed);

        assert_eq!(registry.config(), &before);
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn test_remove_absent_is_reported() {
        let (mut registry, store) = registry(&["@a"]);

        assert_eq!(registry.remove("@zzz").unwrap(), RemoveOutcome::NotPresent);
        assert_eq!(registry.list(), ["@a"]);
        assert!(store.saved.lock().unwrap().is_none());
    }

    #[test]
    fn test_identifier_forms_are_not_normalized() {
        let (registry, _) = registry(&["@news"]);

        assert!(registry.contains("@news"));
        assert!(!registry.contains("news"));
        assert!(!registry.contains("-1001234567890"));
    }

    #[test]
    fn test_failed_add_rolls_back() {
        let (mut registry, store) = registry(&["@a"]);
        store.fail.store(true, Ordering::SeqCst);

        assert!(registry.add("@news").is_err());
        assert_eq!(registry.list(), ["@a"]);
    }

    #[test]
    fn test_failed_remove_rolls_back_in_place() {
        let (mut registry, store) = registry(&["@a", "@b", "@c"]);
        store.fail.store(true, Ordering::SeqCst);

        assert!(registry.remove("@b").is_err());
        assert_eq!(registry.list(), ["@a", "@b", "@c"]);
    }

    #[test]
    fn test_duplicates_in_document_are_dropped() {
        let (registry, _) = registry(&["@a", "@b", "@a"]);
        assert_eq!(registry.list(), ["@a", "@b"]);
    }

    #[test]
    fn test_persistence_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        {
            let store = JsonFileStore::new(Some(path.clone()));
            let config = store.load_or_init().unwrap();
            let mut registry = ChannelRegistry::new(config, Box::new(store));
            registry.add("@news").unwrap();
            registry.add("-1001234567890").unwrap();
        }

        {
            let store = JsonFileStore::new(Some(path));
            let registry = ChannelRegistry::new(store.load().unwrap(), Box::new(store));
            assert_eq!(registry.list(), ["@news", "-1001234567890"]);
        }
    }
}
