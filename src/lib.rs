//! Matching Madness - a timed word/translation matching game
//!
//! Core modules:
//! - `game`: Session engine (board shuffle, selection, match checks, countdown)
//! - `store`: Word sets and words kept in a key-value backend
//! - `platform`: Browser/native storage backends and the shared store handle
//! - `manage`: Set and word management forms
//! - `ui`: Routing and HTML views
//! - `settings`: Player-tunable round parameters

pub mod game;
pub mod manage;
pub mod platform;
pub mod settings;
pub mod store;
pub mod ui;

pub use game::{GamePhase, GameState};
pub use settings::Settings;
pub use store::{SetId, Store, StoreError, Word, WordId, WordSet};

/// Game configuration constants
pub mod consts {
    /// Length of a round in seconds
    pub const ROUND_SECONDS: u32 = 60;
    /// Countdown step (one tick per second)
    pub const TICK_INTERVAL_MS: u64 = 1000;
    /// How long a revealed pair stays on screen before the selection clears
    pub const REVEAL_DELAY_MS: u64 = 500;
    /// Cards per board row
    pub const BOARD_COLUMNS: u32 = 4;
    /// Largest frame delta fed to the engine (tab switches, debugger pauses)
    pub const MAX_FRAME_MS: u64 = 250;
}

/// Current wall-clock time in milliseconds, used for shuffle seeds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Current wall-clock time in milliseconds, used for shuffle seeds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
