//! Persisted record types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a word set, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub u32);

/// Identifier of a word, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(pub u32);

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named collection of words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSet {
    pub id: SetId,
    pub name: String,
}

/// A word and its translation, filed under one set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    /// Owning set. Not checked against the sets collection.
    #[serde(rename = "setId")]
    pub set_id: SetId,
    pub word: String,
    pub translation: String,
}

/// Auto-increment counters, persisted next to the collections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Counters {
    pub next_set_id: u32,
    pub next_word_id: u32,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            next_set_id: 1,
            next_word_id: 1,
        }
    }
}
