/// Round controller: every session transition lives here.
///
/// Each function takes the session explicitly, applies one input or one
/// timer second, and returns the events it produced. Inputs that do not
/// apply to the current phase are ignored and produce no events.
///
/// ## Transitions
///
///   Menu ──start──▶ Playing
///   Playing ──selections used / time up──▶ evaluate
///       evaluate: lives 0               → GameOver
///                 treasure or life found → RoundCleared
///                 otherwise lose a life → GameOver | RoundFailed
///   RoundCleared ──next──▶ Bonus (counter at 5 or 10) | Playing (round+1)
///   RoundFailed  ──retry──▶ Playing (same round, fresh grid)
///   Bonus ──time up──▶ Playing (round+1)
///   any ──restart──▶ Menu

use crate::domain::grid;
use crate::domain::rules::{self, BONUS_TREASURE_SCORE};
use crate::domain::stats::{Hit, SessionStats};
use crate::domain::tile::TileKind;
use super::event::GameEvent;
use super::session::{Phase, RoundState, Session};
use super::timer::TickResult;

// ══════════════════════════════════════════════════════════════
// Session lifecycle
// ══════════════════════════════════════════════════════════════

/// Start a new session from the menu (or after game over).
pub fn start_session(s: &mut Session) -> Vec<GameEvent> {
    if !matches!(s.phase, Phase::Menu | Phase::GameOver) {
        return vec![];
    }
    s.timer.stop();
    s.stats = SessionStats::new();
    s.round = RoundState::first();
    log::info!("session started");

    let mut events = vec![GameEvent::SessionStarted];
    begin_normal_round(s, &mut events);
    events
}

/// Abandon the session and return to the menu.
pub fn restart(s: &mut Session) -> Vec<GameEvent> {
    if s.phase == Phase::Menu {
        return vec![];
    }
    log::info!("returning to menu (round {}, score {})", s.round.round, s.stats.score);
    s.reset();
    vec![GameEvent::ReturnedToMenu]
}

/// Re-apply the normal difficulty for `round`.
pub fn apply_difficulty(s: &mut Session, round: u32) {
    s.round.round = round;
    s.round.apply(rules::difficulty_for(round));
}

// ══════════════════════════════════════════════════════════════
// Tile input
// ══════════════════════════════════════════════════════════════

/// A tile was clicked.
pub fn select_tile(s: &mut Session, index: usize) -> Vec<GameEvent> {
    if index >= s.tiles.len() {
        return vec![];
    }
    match s.phase {
        Phase::Playing => select_normal(s, index),
        Phase::Bonus => select_bonus(s, index),
        _ => vec![],
    }
}

fn select_normal(s: &mut Session, index: usize) -> Vec<GameEvent> {
    // One selection per tile per round
    if s.is_selected(index) || s.round.selections_exhausted() {
        return vec![];
    }
    s.round.selections_made += 1;
    s.selected.push(index);

    let mut events = Vec::with_capacity(4);
    let kind = s.tiles.kind_at(index);
    events.push(match s.stats.apply_hit(kind) {
        Hit::Treasure { gained, multiplier } => GameEvent::TreasureFound { index, gained, multiplier },
        Hit::ExtraLife => GameEvent::ExtraLifeFound { index },
        Hit::ExtraScore { gained } => GameEvent::ExtraScoreFound { index, gained },
        Hit::Miss => GameEvent::Missed { index },
    });

    if s.round.selections_exhausted() {
        evaluate_round_end(s, &mut events);
    }
    events
}

fn select_bonus(s: &mut Session, index: usize) -> Vec<GameEvent> {
    let event = if s.tiles.kind_at(index) == TileKind::Treasure {
        s.stats.add_flat(BONUS_TREASURE_SCORE);
        GameEvent::BonusTreasure { index, gained: BONUS_TREASURE_SCORE }
    } else {
        GameEvent::BonusMiss { index }
    };
    s.round.selections_made = s.round.selections_made.saturating_add(1);
    // Hit or miss, the treasures move
    grid::reroll_treasures(&mut s.rng, &mut s.tiles, s.round.treasure_count);
    vec![event]
}

// ══════════════════════════════════════════════════════════════
// Timer
// ══════════════════════════════════════════════════════════════

/// One countdown second elapsed.
pub fn tick_second(s: &mut Session) -> Vec<GameEvent> {
    if !s.phase.accepts_tiles() {
        return vec![];
    }
    match s.timer.tick() {
        TickResult::Idle => vec![],
        TickResult::Ticked { remaining } => vec![GameEvent::TimerTick { remaining }],
        TickResult::Expired => {
            let mut events = vec![GameEvent::TimerTick { remaining: 0 }, GameEvent::TimeUp];
            if s.phase == Phase::Bonus {
                end_bonus_round(s, &mut events);
            } else {
                evaluate_round_end(s, &mut events);
            }
            events
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Round end
// ══════════════════════════════════════════════════════════════

/// Decide the outcome of a normal round. Called when the selections
/// are used up or the countdown reaches zero.
pub fn evaluate_round_end(s: &mut Session, events: &mut Vec<GameEvent>) {
    if s.phase != Phase::Playing {
        return;
    }
    s.timer.stop();

    if s.stats.is_out() {
        game_over(s, events);
        return;
    }

    if s.found_anything() {
        s.phase = Phase::RoundCleared;
        log::info!("round {} cleared, score {}", s.round.round, s.stats.score);
        events.push(GameEvent::RoundSucceeded { round: s.round.round });
        return;
    }

    // Life depletion wins over retry
    if s.stats.lose_life() {
        game_over(s, events);
    } else {
        s.phase = Phase::RoundFailed;
        log::info!("round {} failed, {} lives left", s.round.round, s.stats.lives);
        events.push(GameEvent::RoundFailed { lives_left: s.stats.lives });
    }
}

fn game_over(s: &mut Session, events: &mut Vec<GameEvent>) {
    s.timer.stop();
    s.phase = Phase::GameOver;
    log::info!("game over at round {} with score {}", s.round.round, s.stats.score);
    events.push(GameEvent::GameOver { round: s.round.round, score: s.stats.score });
}

// ══════════════════════════════════════════════════════════════
// Next round / retry
// ══════════════════════════════════════════════════════════════

/// "Next round" requested after a cleared round.
pub fn next_round(s: &mut Session) -> Vec<GameEvent> {
    if s.phase != Phase::RoundCleared {
        return vec![];
    }
    let mut events = Vec::new();
    if rules::is_bonus_threshold(s.round.round) {
        start_bonus_round(s, &mut events);
    } else {
        let next = s.round.round + 1;
        apply_difficulty(s, next);
        begin_normal_round(s, &mut events);
    }
    events
}

/// "Retry" requested after a failed round: same round, fresh grid.
pub fn retry_round(s: &mut Session) -> Vec<GameEvent> {
    if s.phase != Phase::RoundFailed {
        return vec![];
    }
    let round = s.round.round;
    apply_difficulty(s, round);
    let mut events = Vec::new();
    begin_normal_round(s, &mut events);
    events
}

/// Round setup shared by start, next, retry and post-bonus.
/// Expects `s.round` to already carry the difficulty for the round.
fn begin_normal_round(s: &mut Session, events: &mut Vec<GameEvent>) {
    s.round.selections_made = 0;
    s.selected.clear();
    s.stats.reset_combo();
    s.tiles = grid::assign_items(&mut s.rng, s.round.grid_size, s.round.treasure_count);
    s.phase = Phase::Playing;
    s.timer.start(s.round.time_limit_secs);
    log::info!(
        "round {} started: grid {} treasures {} selections {} time {}s",
        s.round.round, s.round.grid_size, s.round.treasure_count,
        s.round.max_selections, s.round.time_limit_secs,
    );
    events.push(GameEvent::RoundStarted { round: s.round.round });
}

// ══════════════════════════════════════════════════════════════
// Bonus round
// ══════════════════════════════════════════════════════════════

fn start_bonus_round(s: &mut Session, events: &mut Vec<GameEvent>) {
    s.round.apply(rules::bonus_difficulty(s.round.round));
    s.round.selections_made = 0;
    s.selected.clear();
    s.tiles = grid::bonus_items(&mut s.rng, s.round.grid_size, s.round.treasure_count);
    s.phase = Phase::Bonus;
    s.timer.start(s.round.time_limit_secs);
    log::info!("bonus round started after round {}", s.round.round);
    events.push(GameEvent::BonusStarted { round: s.round.round });
}

fn end_bonus_round(s: &mut Session, events: &mut Vec<GameEvent>) {
    s.timer.stop();
    log::info!("bonus round over, score {}", s.stats.score);
    events.push(GameEvent::BonusEnded);
    let next = s.round.round + 1;
    apply_difficulty(s, next);
    begin_normal_round(s, events);
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::tile::TileAssignment;

    fn session() -> Session {
        Session::with_seed(42, Duration::from_secs(1))
    }

    fn started() -> Session {
        let mut s = session();
        start_session(&mut s);
        s
    }

    /// Replace the grid with a known layout: `T` treasure, `L` extra life,
    /// `S` extra score, anything else blank.
    fn layout(s: &mut Session, pattern: &str) {
        let kinds = pattern.chars()
            .map(|c| match c {
                'T' => TileKind::Treasure,
                'L' => TileKind::ExtraLife,
                'S' => TileKind::ExtraScore,
                _ => TileKind::Blank,
            })
            .collect();
        s.tiles = TileAssignment::from_kinds(kinds);
    }

    /// Fill the grid with treasure and use every selection.
    fn clear_round(s: &mut Session) {
        layout(s, &"T".repeat(s.round.grid_size));
        for i in 0..s.round.max_selections as usize {
            select_tile(s, i);
        }
        assert_eq!(s.phase, Phase::RoundCleared);
    }

    /// Tick until the current phase's countdown runs out.
    fn expire(s: &mut Session) -> Vec<GameEvent> {
        let phase = s.phase;
        let mut events = vec![];
        while s.timer.is_running() && s.phase == phase {
            events.extend(tick_second(s));
        }
        events
    }

    // ── start / restart ──

    #[test]
    fn start_session_sets_round_one() {
        let mut s = session();
        let events = start_session(&mut s);
        assert_eq!(events, vec![GameEvent::SessionStarted, GameEvent::RoundStarted { round: 1 }]);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.round.round, 1);
        assert_eq!(s.tiles.len(), 9);
        assert_eq!(s.tiles.count_of(TileKind::Treasure), 2);
        assert_eq!(s.time_remaining(), 10);
        assert!(s.timer.is_running());
        assert_eq!((s.stats.score, s.stats.lives, s.stats.combo), (0, 2, 0));
    }

    #[test]
    fn start_is_ignored_mid_round() {
        let mut s = started();
        s.stats.score = 500;
        assert!(start_session(&mut s).is_empty());
        assert_eq!(s.stats.score, 500);
    }

    #[test]
    fn restart_returns_to_menu_and_discards_session() {
        let mut s = started();
        s.stats.score = 700;
        s.round.round = 4;
        assert_eq!(restart(&mut s), vec![GameEvent::ReturnedToMenu]);
        assert_eq!(s.phase, Phase::Menu);
        assert_eq!(s.stats.score, 0);
        assert_eq!(s.round.round, 1);
        assert!(!s.timer.is_running());
        assert!(restart(&mut s).is_empty());
    }

    // ── selections ──

    #[test]
    fn one_treasure_clears_round() {
        let mut s = started();
        layout(&mut s, "T........");
        select_tile(&mut s, 0);
        let events = select_tile(&mut s, 5);
        assert!(events.contains(&GameEvent::RoundSucceeded { round: 1 }));
        assert_eq!(s.phase, Phase::RoundCleared);
        assert!(!s.timer.is_running());

        let events = next_round(&mut s);
        assert_eq!(events, vec![GameEvent::RoundStarted { round: 2 }]);
        assert_eq!(s.round.round, 2);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.stats.score, 150);
    }

    #[test]
    fn extra_life_counts_as_find() {
        let mut s = started();
        layout(&mut s, "L........");
        select_tile(&mut s, 0);
        select_tile(&mut s, 1);
        assert_eq!(s.phase, Phase::RoundCleared);
        assert_eq!(s.stats.lives, 3);
    }

    #[test]
    fn extra_score_alone_fails_round() {
        let mut s = started();
        layout(&mut s, "S........");
        select_tile(&mut s, 0);
        let events = select_tile(&mut s, 1);
        assert_eq!(s.stats.score, 250);
        assert_eq!(s.phase, Phase::RoundFailed);
        assert!(events.contains(&GameEvent::RoundFailed { lives_left: 1 }));
    }

    #[test]
    fn same_tile_twice_is_ignored() {
        let mut s = started();
        layout(&mut s, "T........");
        let first = select_tile(&mut s, 0);
        assert_eq!(first.len(), 1);
        let score = s.stats.score;
        assert!(select_tile(&mut s, 0).is_empty());
        assert_eq!(s.round.selections_made, 1);
        assert_eq!(s.stats.score, score);
        assert_eq!(s.stats.combo, 1);
        assert_eq!(s.phase, Phase::Playing);
    }

    #[test]
    fn out_of_range_tile_is_ignored() {
        let mut s = started();
        assert!(select_tile(&mut s, 9).is_empty());
        assert_eq!(s.round.selections_made, 0);
    }

    #[test]
    fn tiles_ignored_outside_play() {
        let mut s = session();
        assert!(select_tile(&mut s, 0).is_empty());
        let mut s = started();
        layout(&mut s, ".........");
        select_tile(&mut s, 0);
        select_tile(&mut s, 1);
        assert_eq!(s.phase, Phase::RoundFailed);
        assert!(select_tile(&mut s, 2).is_empty());
    }

    #[test]
    fn combo_law_within_a_round() {
        let mut s = started();
        // Round 11+ allows four selections
        apply_difficulty(&mut s, 11);
        s.round.selections_made = 0;
        layout(&mut s, &"T".repeat(25));
        let gained: Vec<u32> = (0..4)
            .flat_map(|i| select_tile(&mut s, i))
            .filter_map(|e| match e {
                GameEvent::TreasureFound { gained, .. } => Some(gained),
                _ => None,
            })
            .collect();
        assert_eq!(gained, vec![150, 200, 250, 300]);
    }

    #[test]
    fn combo_resets_on_new_round() {
        let mut s = started();
        clear_round(&mut s);
        assert_eq!(s.stats.combo, 2);
        next_round(&mut s);
        assert_eq!(s.stats.combo, 0);
    }

    // ── failures ──

    #[test]
    fn last_life_lost_is_game_over() {
        let mut s = started();
        s.stats.lives = 1;
        layout(&mut s, "........T");
        select_tile(&mut s, 0);
        let events = select_tile(&mut s, 1);
        assert_eq!(s.stats.lives, 0);
        assert_eq!(s.phase, Phase::GameOver);
        assert!(events.contains(&GameEvent::GameOver { round: 1, score: 0 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::RoundFailed { .. })));
        assert!(retry_round(&mut s).is_empty());
    }

    #[test]
    fn time_up_without_find_allows_retry() {
        let mut s = started();
        layout(&mut s, "........T");
        select_tile(&mut s, 0);
        let events = expire(&mut s);
        assert!(events.contains(&GameEvent::TimeUp));
        assert!(events.contains(&GameEvent::RoundFailed { lives_left: 1 }));
        assert_eq!(s.phase, Phase::RoundFailed);
        assert_eq!(s.stats.lives, 1);
    }

    #[test]
    fn time_up_after_find_clears_round() {
        let mut s = started();
        layout(&mut s, "T........");
        select_tile(&mut s, 0);
        expire(&mut s);
        assert_eq!(s.phase, Phase::RoundCleared);
    }

    #[test]
    fn time_up_on_last_life_is_game_over() {
        let mut s = started();
        s.stats.lives = 1;
        layout(&mut s, ".........");
        expire(&mut s);
        assert_eq!(s.phase, Phase::GameOver);
    }

    #[test]
    fn zero_lives_at_evaluation_is_game_over_even_with_find() {
        let mut s = started();
        layout(&mut s, "T........");
        select_tile(&mut s, 0);
        s.stats.lives = 0;
        let mut events = vec![];
        evaluate_round_end(&mut s, &mut events);
        assert_eq!(s.phase, Phase::GameOver);
    }

    #[test]
    fn retry_keeps_round_and_score() {
        let mut s = started();
        clear_round(&mut s);
        next_round(&mut s);
        let score = s.stats.score;
        layout(&mut s, ".........");
        select_tile(&mut s, 0);
        select_tile(&mut s, 1);
        assert_eq!(s.phase, Phase::RoundFailed);

        let events = retry_round(&mut s);
        assert_eq!(events, vec![GameEvent::RoundStarted { round: 2 }]);
        assert_eq!(s.round.round, 2);
        assert_eq!(s.stats.score, score);
        assert_eq!(s.round.selections_made, 0);
        assert!(s.selected.is_empty());
        assert_eq!(s.time_remaining(), 10);
    }

    #[test]
    fn ticks_report_remaining() {
        let mut s = started();
        assert_eq!(tick_second(&mut s), vec![GameEvent::TimerTick { remaining: 9 }]);
        assert_eq!(s.time_remaining(), 9);
    }

    #[test]
    fn ticks_ignored_while_waiting_for_input() {
        let mut s = started();
        clear_round(&mut s);
        assert!(tick_second(&mut s).is_empty());
    }

    // ── difficulty progression ──

    #[test]
    fn world_two_starts_at_round_six() {
        let mut s = started();
        for _ in 1..5 {
            clear_round(&mut s);
            next_round(&mut s);
        }
        assert_eq!(s.round.round, 5);
        assert_eq!(s.round.grid_size, 9);
        clear_round(&mut s);
        next_round(&mut s);
        assert_eq!(s.phase, Phase::Bonus);
        expire(&mut s);
        assert_eq!(s.round.round, 6);
        assert_eq!(s.round.grid_size, 16);
        assert_eq!(s.round.treasure_count, 3);
        assert_eq!(s.round.max_selections, 3);
        assert_eq!(s.time_remaining(), 15);
    }

    // ── bonus round ──

    fn at_bonus(round: u32) -> Session {
        let mut s = started();
        apply_difficulty(&mut s, round);
        clear_round(&mut s);
        next_round(&mut s);
        s
    }

    #[test]
    fn bonus_round_follows_round_five() {
        let mut s = started();
        apply_difficulty(&mut s, 5);
        clear_round(&mut s);
        let events = next_round(&mut s);
        assert_eq!(events, vec![GameEvent::BonusStarted { round: 5 }]);
        assert_eq!(s.phase, Phase::Bonus);
        assert_eq!(s.round.round, 5);
        assert_eq!(s.round.grid_size, 9);
        assert_eq!(s.round.treasure_count, 6);
        assert!(s.round.is_unlimited());
        assert_eq!(s.time_remaining(), 10);
        assert_eq!(s.tiles.count_of(TileKind::Treasure), 6);
    }

    #[test]
    fn bonus_at_ten_uses_world_two_grid() {
        let s = at_bonus(10);
        assert_eq!(s.phase, Phase::Bonus);
        assert_eq!(s.round.grid_size, 16);
    }

    #[test]
    fn no_bonus_between_other_rounds() {
        let mut s = started();
        apply_difficulty(&mut s, 4);
        clear_round(&mut s);
        next_round(&mut s);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.round.round, 5);
    }

    #[test]
    fn bonus_click_regenerates_treasures() {
        let mut s = at_bonus(5);
        // Only tile 0 holds treasure; any click must reroll to six treasures
        layout(&mut s, "T........");
        let events = select_tile(&mut s, 0);
        assert_eq!(events, vec![GameEvent::BonusTreasure { index: 0, gained: 150 }]);
        assert_eq!(s.tiles.count_of(TileKind::Treasure), 6);

        layout(&mut s, "T........");
        let events = select_tile(&mut s, 4);
        assert_eq!(events, vec![GameEvent::BonusMiss { index: 4 }]);
        assert_eq!(s.tiles.count_of(TileKind::Treasure), 6);
    }

    #[test]
    fn bonus_clicks_are_unlimited_and_flat() {
        let mut s = at_bonus(5);
        let base = s.stats.score;
        let combo = s.stats.combo;
        for _ in 0..50 {
            layout(&mut s, "TTTTTTTTT");
            select_tile(&mut s, 3);
        }
        assert_eq!(s.phase, Phase::Bonus);
        assert_eq!(s.stats.score, base + 50 * 150);
        assert_eq!(s.stats.combo, combo);
    }

    #[test]
    fn bonus_expiry_starts_next_round() {
        let mut s = at_bonus(5);
        let lives = s.stats.lives;
        let events = expire(&mut s);
        assert!(events.contains(&GameEvent::BonusEnded));
        assert!(events.contains(&GameEvent::RoundStarted { round: 6 }));
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.round.round, 6);
        assert_eq!(s.stats.lives, lives);
        assert!(s.timer.is_running());
        assert_eq!(s.round.selections_made, 0);
    }

    #[test]
    fn game_over_then_start_gives_fresh_session() {
        let mut s = started();
        s.stats.lives = 1;
        s.stats.score = 900;
        layout(&mut s, ".........");
        select_tile(&mut s, 0);
        select_tile(&mut s, 1);
        assert_eq!(s.phase, Phase::GameOver);
        start_session(&mut s);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.stats.score, 0);
        assert_eq!(s.stats.lives, 2);
    }
}
