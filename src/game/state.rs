//! Session state and core game types
//!
//! One `GameState` is one play session over a fixed word list. Nothing in
//! here touches the store; the board is built once from the words handed in.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::settings::Settings;
use crate::store::{Word, WordId};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Countdown running, selections accepted
    InProgress,
    /// Countdown reached zero first
    GameOverLost,
    /// Every card matched before the countdown ran out
    GameOverWin,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        !matches!(self, GamePhase::InProgress)
    }
}

/// Which side of a word a card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Word,
    Translation,
}

/// One face-up card. Both cards of a word carry the word's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: WordId,
    pub content: String,
    pub kind: CardKind,
}

/// A card the player has picked, awaiting its partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub content: String,
    pub index: usize,
    pub id: WordId,
}

/// Result of comparing two picks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Correct,
    Incorrect,
}

/// How a card should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    /// Already matched, removed from play
    Hidden,
    /// Half of a pair that just failed to match
    Error,
    /// Picked, waiting on a second pick or the reveal delay
    Selected,
    Default,
}

/// Timed events owned by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// One-second countdown step
    CountdownTick,
    /// End of the reveal delay after a pair was checked
    ResolveSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scheduled {
    pub due_ms: u64,
    pub event: ScheduledEvent,
}

/// Observable transitions, for logging and the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Selected { index: usize },
    Matched { first: usize, second: usize },
    Mismatched { first: usize, second: usize },
    SelectionCleared,
    Countdown { remaining: u32 },
    Won,
    Lost,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot start a game without words")]
    EmptyWordList,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session number; bumps on every play-again
    pub epoch: u64,
    /// Shuffle seed
    pub seed: u64,
    /// Shuffled board, two cards per word
    pub cards: Vec<Card>,
    /// Current picks (0..=2)
    pub selection: Vec<Pick>,
    /// Board indices already paired off
    pub matched: BTreeSet<usize>,
    /// Visual flag while a checked pair is still showing
    pub feedback: Option<MatchOutcome>,
    /// Seconds left on the countdown
    pub time_left: u32,
    pub phase: GamePhase,
    /// Milliseconds since the session started
    pub clock_ms: u64,
    pub(crate) schedule: Vec<Scheduled>,
    words: Vec<Word>,
    settings: Settings,
}

impl GameState {
    /// Start a session with default settings
    pub fn new(words: Vec<Word>, seed: u64) -> Result<Self, GameError> {
        Self::with_settings(words, seed, Settings::default())
    }

    /// Start a session
    pub fn with_settings(words: Vec<Word>, seed: u64, settings: Settings) -> Result<Self, GameError> {
        if words.is_empty() {
            return Err(GameError::EmptyWordList);
        }
        Ok(Self::start(words, seed, settings, 0))
    }

    /// Fresh session over the same words: new shuffle, timer and picks
    pub fn play_again(&self, seed: u64) -> Self {
        Self::start(self.words.clone(), seed, self.settings.clone(), self.epoch + 1)
    }

    /// Tag the session with an app-wide epoch
    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    fn start(words: Vec<Word>, seed: u64, settings: Settings, epoch: u64) -> Self {
        let cards = shuffled_board(&words, seed);
        let mut state = Self {
            epoch,
            seed,
            cards,
            selection: Vec::with_capacity(2),
            matched: BTreeSet::new(),
            feedback: None,
            time_left: settings.round_seconds,
            phase: GamePhase::InProgress,
            clock_ms: 0,
            schedule: Vec::new(),
            words,
            settings,
        };
        state.schedule_in(crate::consts::TICK_INTERVAL_MS, ScheduledEvent::CountdownTick);

        log::info!(
            "Session {} started: {} words, {} cards, seed {}",
            state.epoch,
            state.words.len(),
            state.cards.len(),
            seed
        );
        state
    }

    /// Number of words (pairs) on the board
    pub fn total_pairs(&self) -> usize {
        self.words.len()
    }

    /// Pairs matched so far
    pub fn matches(&self) -> usize {
        self.matched.len() / 2
    }

    /// Fraction of pairs matched (0.0 - 1.0)
    pub fn progress(&self) -> f32 {
        self.matches() as f32 / self.total_pairs() as f32
    }

    /// Whether this state belongs to session `epoch`
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether `index` is one of the current picks
    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.iter().any(|p| p.index == index)
    }

    /// Queue `event` to fire `delay_ms` from now
    pub(crate) fn schedule_in(&mut self, delay_ms: u64, event: ScheduledEvent) {
        self.schedule.push(Scheduled {
            due_ms: self.clock_ms + delay_ms,
            event,
        });
    }

    /// Drop every queued `event`
    pub(crate) fn cancel(&mut self, event: ScheduledEvent) {
        self.schedule.retain(|s| s.event != event);
    }

    /// Whether an event of this kind is queued
    pub fn is_scheduled(&self, event: ScheduledEvent) -> bool {
        self.schedule.iter().any(|s| s.event == event)
    }

    /// Game over with nothing left to fire; the clock can stop
    pub fn is_settled(&self) -> bool {
        self.phase.is_over() && self.schedule.is_empty()
    }
}

/// Two cards per word, shuffled with a seeded PCG
pub fn shuffled_board(words: &[Word], seed: u64) -> Vec<Card> {
    let mut cards: Vec<Card> = words
        .iter()
        .flat_map(|w| {
            [
                Card {
                    id: w.id,
                    content: w.word.clone(),
                    kind: CardKind::Word,
                },
                Card {
                    id: w.id,
                    content: w.translation.clone(),
                    kind: CardKind::Translation,
                },
            ]
        })
        .collect();

    let mut rng = Pcg32::seed_from_u64(seed);
    cards.shuffle(&mut rng);
    cards
}
