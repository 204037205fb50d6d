/// Session: the complete state of one running game.
///
/// Everything the round controller mutates lives here and is passed
/// explicitly to `step::*`. Returning to the menu resets it; only the
/// RNG and the countdown's second length survive.
///
/// ## Phase vs Mode
///
/// `Phase` is what the controller switches on. `Mode` is the coarse view
/// exposed to the presentation layer:
///
///   Menu         → Mode::Menu
///   Playing      → Mode::Normal   (tiles accept selections)
///   RoundCleared → Mode::Normal   (waiting for "next round")
///   RoundFailed  → Mode::Normal   (waiting for "retry")
///   Bonus        → Mode::Bonus
///   GameOver     → Mode::GameOver

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::rules::{self, Difficulty};
use crate::domain::stats::SessionStats;
use crate::domain::tile::{TileAssignment, TileKind};
use super::timer::Countdown;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Menu,
    Playing,
    RoundCleared,
    RoundFailed,
    Bonus,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Menu,
    Normal,
    Bonus,
    GameOver,
}

impl Phase {
    pub fn mode(self) -> Mode {
        match self {
            Phase::Menu => Mode::Menu,
            Phase::Playing | Phase::RoundCleared | Phase::RoundFailed => Mode::Normal,
            Phase::Bonus => Mode::Bonus,
            Phase::GameOver => Mode::GameOver,
        }
    }

    /// Does this phase accept tile selections?
    pub fn accepts_tiles(self) -> bool {
        matches!(self, Phase::Playing | Phase::Bonus)
    }
}

/// Parameters and progress of the current round.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RoundState {
    pub round: u32,
    pub grid_size: usize,
    pub treasure_count: usize,
    pub max_selections: u32,
    pub time_limit_secs: u32,
    pub selections_made: u32,
}

impl RoundState {
    pub fn first() -> Self {
        let mut r = RoundState {
            round: 1,
            grid_size: 0,
            treasure_count: 0,
            max_selections: 0,
            time_limit_secs: 0,
            selections_made: 0,
        };
        r.apply(rules::difficulty_for(1));
        r
    }

    /// Take over grid/treasure/selection/time parameters.
    pub fn apply(&mut self, d: Difficulty) {
        self.grid_size = d.grid_size;
        self.treasure_count = d.treasure_count;
        self.max_selections = d.max_selections;
        self.time_limit_secs = d.time_limit_secs;
    }

    pub fn selections_exhausted(&self) -> bool {
        self.selections_made >= self.max_selections
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_selections == rules::UNLIMITED_SELECTIONS
    }
}

pub struct Session {
    pub phase: Phase,
    pub round: RoundState,
    pub stats: SessionStats,
    pub tiles: TileAssignment,
    /// Tiles selected this round, in selection order.
    pub selected: Vec<usize>,
    pub timer: Countdown,
    pub rng: StdRng,
}

impl Session {
    /// Fresh session in the menu, seeded from the OS.
    pub fn new(second: Duration) -> Self {
        Self::with_rng(StdRng::from_os_rng(), second)
    }

    /// Deterministic session for tests.
    #[cfg(test)]
    pub fn with_seed(seed: u64, second: Duration) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), second)
    }

    fn with_rng(rng: StdRng, second: Duration) -> Self {
        Session {
            phase: Phase::Menu,
            round: RoundState::first(),
            stats: SessionStats::new(),
            tiles: TileAssignment::blank(rules::difficulty_for(1).grid_size),
            selected: vec![],
            timer: Countdown::new(second),
            rng,
        }
    }

    /// Drop all session data and go back to round-1 defaults.
    pub fn reset(&mut self) {
        self.timer.stop();
        self.phase = Phase::Menu;
        self.round = RoundState::first();
        self.stats = SessionStats::new();
        self.tiles = TileAssignment::blank(self.round.grid_size);
        self.selected.clear();
    }

    pub fn mode(&self) -> Mode {
        self.phase.mode()
    }

    pub fn time_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Was any selected tile a treasure or an extra life?
    pub fn found_anything(&self) -> bool {
        self.selected.iter().any(|&i| self.tiles.kind_at(i).counts_as_find())
    }

    /// Kind under a selected tile, None while still hidden.
    pub fn revealed(&self, index: usize) -> Option<TileKind> {
        if self.is_selected(index) {
            Some(self.tiles.kind_at(index))
        } else {
            None
        }
    }
}
