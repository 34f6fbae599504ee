//! First-run example data
//!
//! Seeding is an explicit startup step. Reads never seed.

use super::{Result, Store};
use crate::platform::StorageBackend;

/// Name of the example set created on first run
pub const EXAMPLE_SET_NAME: &str = "Example Data (Japanese)";

/// Example vocabulary (word, translation)
pub const JAPANESE_SET: [(&str, &str); 8] = [
    ("貿易", "trade"),
    ("部長", "manager"),
    ("ぶどう", "grapes"),
    ("文学", "literature"),
    ("文化", "culture"),
    ("文法", "grammar"),
    ("チェック", "to check"),
    ("血", "blood"),
];

impl<B: StorageBackend> Store<B> {
    /// Create the example set if there are no sets at all.
    /// Returns true when it seeded.
    pub fn seed_if_empty(&mut self) -> Result<bool> {
        if !self.all_sets().is_empty() {
            return Ok(false);
        }

        let set = self.add_set(EXAMPLE_SET_NAME)?;
        for (word, translation) in JAPANESE_SET {
            self.add_word(set.id, word, translation)?;
        }

        log::info!(
            "Seeded example set {} with {} words",
            set.id,
            JAPANESE_SET.len()
        );
        Ok(true)
    }
}
