//! Word set persistence
//!
//! Two collections, sets and words, each stored as a JSON array under its
//! own key in a `StorageBackend`. Words carry a secondary index by set id
//! that is rebuilt on open and kept current on every word mutation.
//!
//! Nothing here enforces that a word's set exists. Deleting a set leaves its
//! words in place unless `delete_set_with_words` is used.

pub mod models;
pub mod seed;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::platform::StorageBackend;
pub use models::{SetId, Word, WordId, WordSet};
use models::Counters;

/// On-disk schema version. There is no migration path.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_KEY: &str = "matching_madness.schema";
const SETS_KEY: &str = "matching_madness.sets";
const WORDS_KEY: &str = "matching_madness.words";
const META_KEY: &str = "matching_madness.meta";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Word set not found: {0}")]
    SetNotFound(SetId),

    #[error("Word not found: {0}")]
    WordNotFound(WordId),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported schema version {0}")]
    UnsupportedSchema(u32),

    #[error("No {0} ids left to assign")]
    IdsExhausted(&'static str),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Word sets and words over a key-value backend
#[derive(Debug)]
pub struct Store<B: StorageBackend> {
    backend: B,
    sets: BTreeMap<SetId, WordSet>,
    words: BTreeMap<WordId, Word>,
    by_set: BTreeMap<SetId, BTreeSet<WordId>>,
    counters: Counters,
}

impl<B: StorageBackend> Store<B> {
    /// Open the store, creating the schema on first use
    pub fn open(mut backend: B) -> Result<Self> {
        match backend.get_item(SCHEMA_KEY)? {
            Some(raw) => {
                let version: u32 = serde_json::from_str(&raw)?;
                if version != SCHEMA_VERSION {
                    return Err(StoreError::UnsupportedSchema(version));
                }
            }
            None => {
                backend.set_item(SCHEMA_KEY, &SCHEMA_VERSION.to_string())?;
                log::info!("Created word store schema v{}", SCHEMA_VERSION);
            }
        }

        let sets: Vec<WordSet> = read_json(&backend, SETS_KEY)?.unwrap_or_default();
        let words: Vec<Word> = read_json(&backend, WORDS_KEY)?.unwrap_or_default();
        let mut counters: Counters = read_json(&backend, META_KEY)?.unwrap_or_default();

        // Never hand out an id that is already on disk
        if let Some(max) = sets.iter().map(|s| s.id.0).max() {
            counters.next_set_id = counters.next_set_id.max(id_after(max));
        }
        if let Some(max) = words.iter().map(|w| w.id.0).max() {
            counters.next_word_id = counters.next_word_id.max(id_after(max));
        }

        let mut store = Self {
            backend,
            sets: sets.into_iter().map(|s| (s.id, s)).collect(),
            words: BTreeMap::new(),
            by_set: BTreeMap::new(),
            counters,
        };
        for word in words {
            store.index_word(&word);
            store.words.insert(word.id, word);
        }

        log::info!(
            "Opened word store ({} sets, {} words)",
            store.sets.len(),
            store.words.len()
        );
        Ok(store)
    }

    /// Give back the underlying backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    // === Sets ===

    /// Create a set with a fresh id. Names need not be unique.
    pub fn add_set(&mut self, name: &str) -> Result<WordSet> {
        let id = SetId(self.counters.next_set_id);
        if id.0 == EXHAUSTED {
            return Err(StoreError::IdsExhausted("set"));
        }
        self.commit_counters(Counters {
            next_set_id: id_after(id.0),
            ..self.counters.clone()
        })?;

        let set = WordSet {
            id,
            name: name.to_string(),
        };
        let mut sets = self.sets.clone();
        sets.insert(id, set.clone());
        self.commit_sets(sets)?;
        log::debug!("Added set {} ({:?})", id, set.name);
        Ok(set)
    }

    /// Write a set under its id, whether or not it exists yet
    pub fn update_set(&mut self, set: &WordSet) -> Result<()> {
        if set.id.0 >= self.counters.next_set_id {
            self.commit_counters(Counters {
                next_set_id: id_after(set.id.0),
                ..self.counters.clone()
            })?;
        }
        let mut sets = self.sets.clone();
        sets.insert(set.id, set.clone());
        self.commit_sets(sets)?;
        log::debug!("Updated set {}", set.id);
        Ok(())
    }

    /// Remove a set. Its words stay behind, still reachable by the old id.
    pub fn delete_set(&mut self, id: SetId) -> Result<()> {
        if self.sets.contains_key(&id) {
            let mut sets = self.sets.clone();
            sets.remove(&id);
            self.commit_sets(sets)?;
            log::debug!("Deleted set {}", id);
        }
        Ok(())
    }

    /// Remove a set together with every word filed under it
    pub fn delete_set_with_words(&mut self, id: SetId) -> Result<usize> {
        self.delete_set(id)?;
        let ids = self.by_set.get(&id).cloned().unwrap_or_default();
        if !ids.is_empty() {
            let mut words = self.words.clone();
            words.retain(|word_id, _| !ids.contains(word_id));
            self.commit_words(words)?;
            self.by_set.remove(&id);
        }
        log::debug!("Deleted set {} with {} words", id, ids.len());
        Ok(ids.len())
    }

    /// All sets in id order
    pub fn all_sets(&self) -> Vec<WordSet> {
        self.sets.values().cloned().collect()
    }

    /// A single set by id
    pub fn set_info(&self, id: SetId) -> Result<WordSet> {
        self.sets
            .get(&id)
            .cloned()
            .ok_or(StoreError::SetNotFound(id))
    }

    // === Words ===

    /// Create a word in `set_id` with a fresh id
    pub fn add_word(&mut self, set_id: SetId, word: &str, translation: &str) -> Result<Word> {
        let id = WordId(self.counters.next_word_id);
        if id.0 == EXHAUSTED {
            return Err(StoreError::IdsExhausted("word"));
        }
        self.commit_counters(Counters {
            next_word_id: id_after(id.0),
            ..self.counters.clone()
        })?;

        let word = Word {
            id,
            set_id,
            word: word.to_string(),
            translation: translation.to_string(),
        };
        let mut words = self.words.clone();
        words.insert(id, word.clone());
        self.commit_words(words)?;
        self.index_word(&word);
        log::debug!("Added word {} to set {}", id, set_id);
        Ok(word)
    }

    /// Write a word under its id, whether or not it exists yet
    pub fn update_word(&mut self, word: &Word) -> Result<()> {
        if word.id.0 >= self.counters.next_word_id {
            self.commit_counters(Counters {
                next_word_id: id_after(word.id.0),
                ..self.counters.clone()
            })?;
        }
        let mut words = self.words.clone();
        let old = words.insert(word.id, word.clone());
        self.commit_words(words)?;
        if let Some(old) = old {
            self.unindex_word(&old);
        }
        self.index_word(word);
        log::debug!("Updated word {}", word.id);
        Ok(())
    }

    /// Remove a word; missing ids are ignored
    pub fn delete_word(&mut self, id: WordId) -> Result<()> {
        let mut words = self.words.clone();
        if let Some(old) = words.remove(&id) {
            self.commit_words(words)?;
            self.unindex_word(&old);
            log::debug!("Deleted word {}", id);
        }
        Ok(())
    }

    /// A single word by id
    pub fn word(&self, id: WordId) -> Result<Word> {
        self.words
            .get(&id)
            .cloned()
            .ok_or(StoreError::WordNotFound(id))
    }

    /// Every word filed under `set_id`, in id order
    pub fn words_by_set(&self, set_id: SetId) -> Vec<Word> {
        self.by_set
            .get(&set_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.words.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    // === Internals ===
    //
    // Each commit writes first and swaps the in-memory copy only once the
    // backend accepted it, so memory never runs ahead of storage.

    fn index_word(&mut self, word: &Word) {
        self.by_set.entry(word.set_id).or_default().insert(word.id);
    }

    fn unindex_word(&mut self, word: &Word) {
        if let Some(ids) = self.by_set.get_mut(&word.set_id) {
            ids.remove(&word.id);
            if ids.is_empty() {
                self.by_set.remove(&word.set_id);
            }
        }
    }

    fn commit_sets(&mut self, sets: BTreeMap<SetId, WordSet>) -> Result<()> {
        let list: Vec<&WordSet> = sets.values().collect();
        write_json(&mut self.backend, SETS_KEY, &list)?;
        self.sets = sets;
        Ok(())
    }

    fn commit_words(&mut self, words: BTreeMap<WordId, Word>) -> Result<()> {
        let list: Vec<&Word> = words.values().collect();
        write_json(&mut self.backend, WORDS_KEY, &list)?;
        self.words = words;
        Ok(())
    }

    fn commit_counters(&mut self, counters: Counters) -> Result<()> {
        write_json(&mut self.backend, META_KEY, &counters)?;
        self.counters = counters;
        Ok(())
    }
}

/// Counter value meaning no fresh ids are left. It is never handed out by
/// `add_*`, so a record stored under it cannot be overwritten by one.
const EXHAUSTED: u32 = u32::MAX;

fn id_after(id: u32) -> u32 {
    id.saturating_add(1)
}

fn read_json<B: StorageBackend, T: DeserializeOwned>(backend: &B, key: &str) -> Result<Option<T>> {
    match backend.get_item(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn write_json<B: StorageBackend, T: Serialize + ?Sized>(
    backend: &mut B,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    backend.set_item(key, &json)
}
