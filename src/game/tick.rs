//! Session transitions
//!
//! Player input (`select`) and the session clock (`advance`) are the only
//! ways a session changes. Timed work (the countdown and the end of a
//! reveal) lives in the session's own schedule, so replacing a session
//! drops anything the old one still had queued.

use super::state::{
    CardStyle, GameEvent, GamePhase, GameState, MatchOutcome, Pick, ScheduledEvent,
};
use crate::consts::TICK_INTERVAL_MS;

/// Pick the card at `index`.
///
/// Ignored (no events) once the game is over, while two picks are pending,
/// for an index already picked or matched, and for indices off the board.
pub fn select(state: &mut GameState, index: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase != GamePhase::InProgress
        || state.selection.len() >= 2
        || index >= state.cards.len()
        || state.is_selected(index)
        || state.matched.contains(&index)
    {
        return events;
    }

    let card = &state.cards[index];
    state.selection.push(Pick {
        content: card.content.clone(),
        index,
        id: card.id,
    });
    events.push(GameEvent::Selected { index });

    if state.selection.len() == 2 {
        check_match(state, &mut events);
    }
    events
}

/// Compare the two pending picks and queue the end of the reveal
fn check_match(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let (first, second) = (&state.selection[0], &state.selection[1]);
    let (a, b) = (first.index, second.index);

    if first.id == second.id {
        state.matched.insert(a);
        state.matched.insert(b);
        state.feedback = Some(MatchOutcome::Correct);
        events.push(GameEvent::Matched {
            first: a,
            second: b,
        });
        log::debug!("Matched cards {} and {}", a, b);
    } else {
        state.feedback = Some(MatchOutcome::Incorrect);
        events.push(GameEvent::Mismatched {
            first: a,
            second: b,
        });
        log::debug!("Mismatched cards {} and {}", a, b);
    }

    let delay = state.settings().reveal_delay_ms;
    state.schedule_in(delay, ScheduledEvent::ResolveSelection);

    if state.feedback == Some(MatchOutcome::Correct) {
        check_win(state, events);
    }
}

fn check_win(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.matched.len() == 2 * state.total_pairs() {
        finish(state, GamePhase::GameOverWin, events);
    }
}

/// Enter a terminal phase: freeze the countdown at zero
fn finish(state: &mut GameState, phase: GamePhase, events: &mut Vec<GameEvent>) {
    state.phase = phase;
    state.time_left = 0;
    state.cancel(ScheduledEvent::CountdownTick);
    match phase {
        GamePhase::GameOverWin => {
            events.push(GameEvent::Won);
            log::info!("Session {} won at {} ms", state.epoch, state.clock_ms);
        }
        GamePhase::GameOverLost => {
            events.push(GameEvent::Lost);
            log::info!(
                "Session {} lost with {}/{} pairs",
                state.epoch,
                state.matches(),
                state.total_pairs()
            );
        }
        GamePhase::InProgress => {}
    }
}

/// One countdown step. Reaching zero loses the game.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::InProgress {
        return events;
    }

    state.time_left = state.time_left.saturating_sub(1);
    events.push(GameEvent::Countdown {
        remaining: state.time_left,
    });
    if state.time_left == 0 {
        finish(state, GamePhase::GameOverLost, &mut events);
    }
    events
}

/// Clear the picks and the match feedback
pub fn resolve_selection(state: &mut GameState) -> Vec<GameEvent> {
    state.cancel(ScheduledEvent::ResolveSelection);
    if state.selection.is_empty() && state.feedback.is_none() {
        return Vec::new();
    }
    state.selection.clear();
    state.feedback = None;
    vec![GameEvent::SelectionCleared]
}

/// Move the session clock forward, firing due events in time order
pub fn advance(state: &mut GameState, dt_ms: u64) -> Vec<GameEvent> {
    let target = state.clock_ms + dt_ms;
    let mut events = Vec::new();

    loop {
        // Earliest due event; ties keep queue order
        let next = state
            .schedule
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= target)
            .min_by_key(|(i, s)| (s.due_ms, *i))
            .map(|(i, _)| i);
        let Some(i) = next else { break };

        let due = state.schedule.remove(i);
        state.clock_ms = due.due_ms;
        match due.event {
            ScheduledEvent::CountdownTick => {
                events.extend(tick(state));
                if state.phase == GamePhase::InProgress {
                    state.schedule_in(TICK_INTERVAL_MS, ScheduledEvent::CountdownTick);
                }
            }
            ScheduledEvent::ResolveSelection => {
                events.extend(resolve_selection(state));
            }
        }
    }

    state.clock_ms = target;
    events
}

/// `advance`, but only if `state` is still session `epoch`.
/// Frame callbacks from a replaced session land here and do nothing.
pub fn advance_session(state: &mut GameState, epoch: u64, dt_ms: u64) -> Vec<GameEvent> {
    if !state.is_current(epoch) {
        log::debug!(
            "Ignoring frame for stale session {} (current {})",
            epoch,
            state.epoch
        );
        return Vec::new();
    }
    advance(state, dt_ms)
}

/// How the card at `index` should be drawn right now
pub fn card_style(state: &GameState, index: usize) -> CardStyle {
    if state.matched.contains(&index) {
        return CardStyle::Hidden;
    }
    let selected = state.is_selected(index);
    if selected && state.feedback == Some(MatchOutcome::Incorrect) && state.selection.len() == 2 {
        return CardStyle::Error;
    }
    if selected {
        return CardStyle::Selected;
    }
    CardStyle::Default
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::CardKind;
    use crate::store::{SetId, Word, WordId};

    fn word(id: u32, w: &str, t: &str) -> Word {
        Word {
            id: WordId(id),
            set_id: SetId(1),
            word: w.to_string(),
            translation: t.to_string(),
        }
    }

    fn words() -> Vec<Word> {
        vec![
            word(1, "犬", "dog"),
            word(2, "猫", "cat"),
            word(3, "鳥", "bird"),
        ]
    }

    /// Board indices of the two cards for word `id`
    fn pair(state: &GameState, id: u32) -> (usize, usize) {
        let idx: Vec<usize> = state
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.id == WordId(id))
            .map(|(i, _)| i)
            .collect();
        (idx[0], idx[1])
    }

    /// One card of word `a` and one of word `b`
    fn mismatch(state: &GameState, a: u32, b: u32) -> (usize, usize) {
        (pair(state, a).0, pair(state, b).0)
    }

    #[test]
    fn test_single_word_session_wins() {
        let mut state = GameState::new(vec![word(1, "犬", "dog")], 7).unwrap();
        assert_eq!(state.cards.len(), 2);
        assert!(state.cards.iter().all(|c| c.id == WordId(1)));
        assert!(state.cards.iter().any(|c| c.kind == CardKind::Word && c.content == "犬"));
        assert!(
            state
                .cards
                .iter()
                .any(|c| c.kind == CardKind::Translation && c.content == "dog")
        );

        select(&mut state, 1);
        let events = select(&mut state, 0);
        assert!(events.contains(&GameEvent::Matched { first: 1, second: 0 }));
        assert!(events.contains(&GameEvent::Won));
        assert_eq!(state.matched.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(state.phase, GamePhase::GameOverWin);
        assert_eq!(state.time_left, 0);
    }

    #[test]
    fn test_empty_word_list_rejected() {
        assert_eq!(
            GameState::new(Vec::new(), 1).unwrap_err(),
            crate::game::GameError::EmptyWordList
        );
    }

    #[test]
    fn test_same_index_twice_is_noop() {
        let mut state = GameState::new(words(), 1).unwrap();
        assert_eq!(select(&mut state, 0).len(), 1);
        assert!(select(&mut state, 0).is_empty());
        assert_eq!(state.selection.len(), 1);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut state = GameState::new(words(), 1).unwrap();
        assert!(select(&mut state, 6).is_empty());
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_third_pick_blocked_until_resolved() {
        let mut state = GameState::new(words(), 3).unwrap();
        let (a, b) = mismatch(&state, 1, 2);
        let (c, _) = pair(&state, 3);

        select(&mut state, a);
        let events = select(&mut state, b);
        assert!(events.contains(&GameEvent::Mismatched { first: a, second: b }));
        assert_eq!(state.feedback, Some(MatchOutcome::Incorrect));

        // Blocked while the pair is showing
        assert!(select(&mut state, c).is_empty());
        advance(&mut state, 499);
        assert!(select(&mut state, c).is_empty());

        // Reveal ends at 500 ms
        let events = advance(&mut state, 1);
        assert!(events.contains(&GameEvent::SelectionCleared));
        assert!(state.selection.is_empty());
        assert_eq!(state.feedback, None);
        assert_eq!(select(&mut state, c).len(), 1);
    }

    #[test]
    fn test_match_outcome_depends_only_on_ids() {
        for seed in 0..20 {
            let mut state = GameState::new(words(), seed).unwrap();
            let (a, b) = pair(&state, 2);
            select(&mut state, b);
            select(&mut state, a);
            assert_eq!(state.feedback, Some(MatchOutcome::Correct));

            let mut state = GameState::new(words(), seed).unwrap();
            let (a, b) = mismatch(&state, 1, 3);
            select(&mut state, a);
            select(&mut state, b);
            assert_eq!(state.feedback, Some(MatchOutcome::Incorrect));
            assert!(state.matched.is_empty());
        }
    }

    #[test]
    fn test_duplicate_strings_match_by_id() {
        // Both words read "bank"; only cards of the same word pair up
        let list = vec![word(1, "bank", "銀行"), word(2, "bank", "土手")];
        let mut state = GameState::new(list, 11).unwrap();
        let word_card = |state: &GameState, id: u32| {
            state
                .cards
                .iter()
                .position(|c| c.id == WordId(id) && c.kind == CardKind::Word)
                .unwrap()
        };
        let bank1 = word_card(&state, 1);
        let bank2 = word_card(&state, 2);
        select(&mut state, bank1);
        select(&mut state, bank2);
        assert_eq!(state.feedback, Some(MatchOutcome::Incorrect));
    }

    #[test]
    fn test_win_only_after_last_pair_in_any_order() {
        for order in [[1, 2, 3], [3, 1, 2], [2, 3, 1]] {
            let mut state = GameState::new(words(), 42).unwrap();
            for (n, id) in order.iter().enumerate() {
                assert_eq!(state.phase, GamePhase::InProgress);
                let (a, b) = pair(&state, *id);
                select(&mut state, a);
                select(&mut state, b);
                assert_eq!(state.matches(), n + 1);
                advance(&mut state, 500);
            }
            assert_eq!(state.phase, GamePhase::GameOverWin);
            assert_eq!(state.matched.len(), 6);
            assert!((state.progress() - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_timer_loses_after_sixty_ticks() {
        let mut state = GameState::new(words(), 5).unwrap();
        for _ in 0..59 {
            tick(&mut state);
        }
        assert_eq!(state.time_left, 1);
        assert_eq!(state.phase, GamePhase::InProgress);

        let events = tick(&mut state);
        assert!(events.contains(&GameEvent::Lost));
        assert_eq!(state.phase, GamePhase::GameOverLost);
        assert_eq!(state.time_left, 0);

        // Frozen
        assert!(tick(&mut state).is_empty());
        assert!(select(&mut state, 0).is_empty());
        assert_eq!(state.time_left, 0);
    }

    #[test]
    fn test_clock_drives_countdown() {
        let mut state = GameState::new(words(), 5).unwrap();
        advance(&mut state, 59_999);
        assert_eq!(state.time_left, 1);
        assert_eq!(state.phase, GamePhase::InProgress);

        advance(&mut state, 1);
        assert_eq!(state.phase, GamePhase::GameOverLost);
        assert!(!state.is_scheduled(ScheduledEvent::CountdownTick));

        advance(&mut state, 10_000);
        assert_eq!(state.time_left, 0);
    }

    #[test]
    fn test_one_large_step_fires_every_tick() {
        let mut state = GameState::new(words(), 5).unwrap();
        let events = advance(&mut state, 3_000);
        let ticks = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Countdown { .. }))
            .count();
        assert_eq!(ticks, 3);
        assert_eq!(state.time_left, 57);
    }

    #[test]
    fn test_win_freezes_timer() {
        let mut state = GameState::new(vec![word(1, "血", "blood")], 2).unwrap();
        advance(&mut state, 10_000);
        assert_eq!(state.time_left, 50);

        select(&mut state, 0);
        select(&mut state, 1);
        assert_eq!(state.phase, GamePhase::GameOverWin);
        // The final pair is still on display
        assert!(!state.is_settled());

        advance(&mut state, 120_000);
        assert_eq!(state.phase, GamePhase::GameOverWin);
        assert_eq!(state.time_left, 0);
        assert!(state.is_settled());
    }

    #[test]
    fn test_card_style_precedence() {
        let mut state = GameState::new(words(), 9).unwrap();
        let (m1, m2) = pair(&state, 1);
        select(&mut state, m1);
        assert_eq!(card_style(&state, m1), CardStyle::Selected);
        select(&mut state, m2);
        // Matched wins over selected
        assert_eq!(card_style(&state, m1), CardStyle::Hidden);
        assert_eq!(card_style(&state, m2), CardStyle::Hidden);
        advance(&mut state, 500);

        let (a, b) = mismatch(&state, 2, 3);
        select(&mut state, a);
        select(&mut state, b);
        assert_eq!(card_style(&state, a), CardStyle::Error);
        assert_eq!(card_style(&state, b), CardStyle::Error);
        let other = pair(&state, 2).1;
        assert_eq!(card_style(&state, other), CardStyle::Default);

        advance(&mut state, 500);
        assert_eq!(card_style(&state, a), CardStyle::Default);
        assert_eq!(card_style(&state, m1), CardStyle::Hidden);
    }

    #[test]
    fn test_matched_card_cannot_be_picked() {
        let mut state = GameState::new(words(), 4).unwrap();
        let (a, b) = pair(&state, 1);
        select(&mut state, a);
        select(&mut state, b);
        advance(&mut state, 500);
        assert!(select(&mut state, a).is_empty());
    }

    #[test]
    fn test_play_again_is_a_fresh_session() {
        let mut state = GameState::new(words(), 1).unwrap();
        let (a, b) = pair(&state, 1);
        select(&mut state, a);
        select(&mut state, b);
        advance(&mut state, 20_000);

        let fresh = state.play_again(2);
        assert_eq!(fresh.epoch, state.epoch + 1);
        assert_eq!(fresh.time_left, 60);
        assert!(fresh.matched.is_empty());
        assert!(fresh.selection.is_empty());
        assert_eq!(fresh.clock_ms, 0);
        assert_eq!(fresh.cards.len(), 6);
        assert_eq!(fresh.phase, GamePhase::InProgress);
    }

    #[test]
    fn test_stale_session_frames_ignored() {
        let old = GameState::new(words(), 1).unwrap();
        let old_epoch = old.epoch;
        let mut state = old.play_again(2);

        assert!(advance_session(&mut state, old_epoch, 5_000).is_empty());
        assert_eq!(state.time_left, 60);

        let epoch = state.epoch;
        let events = advance_session(&mut state, epoch, 1_000);
        assert_eq!(events, vec![GameEvent::Countdown { remaining: 59 }]);
    }

    #[test]
    fn test_custom_settings() {
        let settings = crate::Settings {
            round_seconds: 10,
            reveal_delay_ms: 200,
            columns: 2,
        };
        let mut state = GameState::with_settings(words(), 1, settings).unwrap();
        assert_eq!(state.time_left, 10);

        let (a, b) = mismatch(&state, 1, 2);
        select(&mut state, a);
        select(&mut state, b);
        advance(&mut state, 200);
        assert!(state.selection.is_empty());

        advance(&mut state, 10_000);
        assert_eq!(state.phase, GamePhase::GameOverLost);
    }
}
