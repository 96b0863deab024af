//! Host-storage abstraction for the two persisted documents
//!
//! The engine never touches the platform's storage directly. Hosts supply a
//! [`KeyValueStore`] (browser local storage, a settings file, or the
//! in-memory store used by tests and the headless demo) and the profile and
//! leaderboard modules read and write JSON strings through it.
//!
//! Loads are tolerant by design: a missing key, malformed JSON, or a
//! partial document decodes to defaults rather than failing the caller, so
//! stale data from older builds never bricks a save.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage key for the player profile document
pub const PROFILE_KEY: &str = "cytoscape-player-profile";
/// Storage key for the top-scores list
pub const SCORES_KEY: &str = "cytoscape-top-scores";

/// Minimal string-keyed storage the host must provide
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Hash-map backed store for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Decode a stored JSON document, falling back to `T::default()` on a
/// missing key or undecodable payload
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        None => T::default(),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("discarding corrupt document at {key}: {e}");
                T::default()
            }
        },
    }
}

/// Serialize and store a document under `key`
pub fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, &raw),
        Err(e) => log::warn!("failed to encode document for {key}: {e}"),
    }
}
