//! Matching game engine
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and storage:
//! - Board built once per session from a word list
//! - Seeded shuffle only
//! - Time only moves through `advance`/`tick`

pub mod state;
pub mod tick;

pub use state::{
    Card, CardKind, CardStyle, GameError, GameEvent, GamePhase, GameState, MatchOutcome, Pick,
    ScheduledEvent, shuffled_board,
};
pub use tick::{advance, advance_session, card_style, resolve_selection, select, tick};
