//! Per-user saved words and synonym rows.
//!
//! [`UserData`] wraps two [`MapStore`]s:
//!
//! | Map | File (default) | Value |
//! |-----|----------------|-------|
//! | words | `saved_words.json` | `["run", "walk"]` |
//! | results | `saved_results.json` | `[["run", "sprint", ..., "달리다"]]` |
//!
//! Every operation is a full read-modify-write of the relevant map.

use crate::config::StorageConfig;
use crate::llm::TableRow;

use super::backend::{JsonFileStore, MapStore, MemoryStore, StoreError, UserMap};

/// username → distinct saved words, in insertion order.
pub type SavedWords = UserMap<Vec<String>>;

/// username → every synonym row ever saved.
pub type SavedResults = UserMap<Vec<TableRow>>;

pub struct UserData {
    words: Box<dyn MapStore<Vec<String>>>,
    results: Box<dyn MapStore<Vec<TableRow>>>,
}

impl UserData {
    pub fn new(
        words: Box<dyn MapStore<Vec<String>>>,
        results: Box<dyn MapStore<Vec<TableRow>>>,
    ) -> Self {
        Self { words, results }
    }

    /// JSON files at the configured locations.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            Box::new(JsonFileStore::new(config.words_file.clone())),
            Box::new(JsonFileStore::new(config.results_file.clone())),
        )
    }

    /// Two empty in-memory maps.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()))
    }

    /// Append `word` to `username`'s list unless it is already there.
    ///
    /// Returns `true` when the word was added. The map is only rewritten in
    /// that case.
    pub fn save_word(&self, username: &str, word: &str) -> Result<bool, StoreError> {
        let mut map = self.words.load_map()?;
        let list = map.entry(username.to_string()).or_default();

        if list.iter().any(|w| w == word) {
            return Ok(false);
        }

        list.push(word.to_string());
        self.words.save_map(&map)?;
        log::debug!("store: saved word {word:?} for {username:?}");
        Ok(true)
    }

    /// Append all `rows` to `username`'s results, duplicates included.
    pub fn save_results(&self, username: &str, rows: &[TableRow]) -> Result<(), StoreError> {
        let mut map = self.results.load_map()?;
        map.entry(username.to_string())
            .or_default()
            .extend_from_slice(rows);
        self.results.save_map(&map)?;
        log::debug!("store: saved {} rows for {username:?}", rows.len());
        Ok(())
    }

    /// Saved words for `username`, empty when the user is unknown.
    pub fn get_words(&self, username: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.words.load_map()?.swap_remove(username).unwrap_or_default())
    }

    /// Saved rows for `username`, empty when the user is unknown.
    pub fn get_results(&self, username: &str) -> Result<Vec<TableRow>, StoreError> {
        Ok(self.results.load_map()?.swap_remove(username).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
