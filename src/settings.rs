//! Round settings and preferences
//!
//! Persisted as one JSON entry beside the word store.

use serde::{Deserialize, Serialize};

use crate::consts::{BOARD_COLUMNS, REVEAL_DELAY_MS, ROUND_SECONDS};
use crate::platform::StorageBackend;
use crate::platform::storage::open_backend;
use crate::store::StoreError;

/// Storage key, next to the word store's keys
pub const STORAGE_KEY: &str = "matching_madness.settings";

/// Shortest and longest allowed round
pub const ROUND_SECONDS_RANGE: (u32, u32) = (10, 600);
/// Shortest and longest reveal delay
pub const REVEAL_DELAY_RANGE: (u64, u64) = (100, 5000);
/// Narrowest and widest board
pub const COLUMNS_RANGE: (u32, u32) = (1, 8);

/// Player-tunable round parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Countdown length in seconds
    pub round_seconds: u32,
    /// How long a revealed pair stays up (ms)
    pub reveal_delay_ms: u64,
    /// Cards per board row
    pub columns: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,
            reveal_delay_ms: REVEAL_DELAY_MS,
            columns: BOARD_COLUMNS,
        }
    }
}

impl Settings {
    /// Pull every value back into its allowed range
    pub fn clamped(mut self) -> Self {
        self.round_seconds = self
            .round_seconds
            .clamp(ROUND_SECONDS_RANGE.0, ROUND_SECONDS_RANGE.1);
        self.reveal_delay_ms = self
            .reveal_delay_ms
            .clamp(REVEAL_DELAY_RANGE.0, REVEAL_DELAY_RANGE.1);
        self.columns = self.columns.clamp(COLUMNS_RANGE.0, COLUMNS_RANGE.1);
        self
    }

    /// Parse stored JSON, falling back to defaults for anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.clamped(),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Read settings from `backend`. A missing, unreadable or out-of-range
    /// entry is replaced with the settings actually in effect.
    pub fn load_from<B: StorageBackend>(backend: &mut B) -> Result<Self, StoreError> {
        let stored = backend.get_item(STORAGE_KEY)?;
        let settings = stored.as_deref().map(Self::from_json).unwrap_or_default();
        if stored.as_deref() != Some(serde_json::to_string(&settings)?.as_str()) {
            settings.save_to(backend)?;
        }
        Ok(settings)
    }

    pub fn save_to<B: StorageBackend>(&self, backend: &mut B) -> Result<(), StoreError> {
        backend.set_item(STORAGE_KEY, &serde_json::to_string(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load from the platform's storage (LocalStorage on the web)
    pub fn load() -> Self {
        match open_backend().and_then(|mut backend| Self::load_from(&mut backend)) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }
}
