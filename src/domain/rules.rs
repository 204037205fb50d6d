/// Difficulty and scoring rules, table driven.
///
/// Pure functions of the round number. No state, no randomness.
///
/// ## Difficulty Table
///
/// ┌──────────────────┬──────┬───────────┬────────────┬────────┐
/// │ Round             │ Grid │ Treasures │ Selections │ Time   │
/// ├──────────────────┼──────┼───────────┼────────────┼────────┤
/// │ 1 ..= 5           │  9   │     2     │     2      │ 10 s   │
/// │ 6 ..= 10          │ 16   │     3     │     3      │ 15 s   │
/// │ 11 ..             │ 25   │     4     │     4      │ 18 s   │
/// │ Bonus (5, 10)     │ tier │     6     │     ∞      │ 10 s   │
/// └──────────────────┴──────┴───────────┴────────────┴────────┘
///
/// ## Scoring
///
/// ┌────────────────┬──────────────────────────────┬──────────────┐
/// │ Hit             │ Score                        │ Combo        │
/// ├────────────────┼──────────────────────────────┼──────────────┤
/// │ Treasure        │ floor(100 × (1 + combo×0.5)) │ +1 (before)  │
/// │ Extra life      │ 0, lives +1                  │ unchanged    │
/// │ Extra score     │ 250 flat                     │ unchanged    │
/// │ Blank           │ 0                            │ reset to 0   │
/// │ Bonus treasure  │ 150 flat                     │ unchanged    │
/// └────────────────┴──────────────────────────────┴──────────────┘

/// Last round of world 1 (3×3) and first bonus threshold.
pub const WORLD1_LAST_ROUND: u32 = 5;
/// Last round of world 2 (4×4) and second bonus threshold.
pub const WORLD2_LAST_ROUND: u32 = 10;

pub const STARTING_LIVES: u32 = 2;

pub const TREASURE_BASE_SCORE: u32 = 100;
pub const EXTRA_SCORE_BONUS: u32 = 250;
pub const BONUS_TREASURE_SCORE: u32 = 150;

pub const EXTRA_LIFE_CHANCE: f64 = 0.3;
pub const EXTRA_SCORE_CHANCE: f64 = 0.3;

pub const BONUS_TREASURES: usize = 6;
pub const BONUS_SECONDS: u32 = 10;
/// Selection cap used during a bonus round: effectively unbounded.
pub const UNLIMITED_SELECTIONS: u32 = u32::MAX;

/// Per-round parameters derived from the round number.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Difficulty {
    pub grid_size: usize,
    pub treasure_count: usize,
    pub max_selections: u32,
    pub time_limit_secs: u32,
}

/// Which world a round belongs to. Determines grid size.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum World {
    Grid3,
    Grid4,
    Grid5,
}

impl World {
    pub fn of_round(round: u32) -> World {
        if round <= WORLD1_LAST_ROUND {
            World::Grid3
        } else if round <= WORLD2_LAST_ROUND {
            World::Grid4
        } else {
            World::Grid5
        }
    }

    pub fn grid_size(self) -> usize {
        match self {
            World::Grid3 => 9,
            World::Grid4 => 16,
            World::Grid5 => 25,
        }
    }
}

/// Normal-round difficulty for `round` (step function, see table).
pub fn difficulty_for(round: u32) -> Difficulty {
    let world = World::of_round(round);
    let (treasure_count, max_selections, time_limit_secs) = match world {
        World::Grid3 => (2, 2, 10),
        World::Grid4 => (3, 3, 15),
        World::Grid5 => (4, 4, 18),
    };
    Difficulty {
        grid_size: world.grid_size(),
        treasure_count,
        max_selections,
        time_limit_secs,
    }
}

/// Bonus-round parameters when triggered at counter `round`.
/// Grid size follows the world of the counter at trigger time.
pub fn bonus_difficulty(round: u32) -> Difficulty {
    Difficulty {
        grid_size: World::of_round(round).grid_size(),
        treasure_count: BONUS_TREASURES,
        max_selections: UNLIMITED_SELECTIONS,
        time_limit_secs: BONUS_SECONDS,
    }
}

/// Does advancing past `round` go through a bonus round first?
pub fn is_bonus_threshold(round: u32) -> bool {
    round == WORLD1_LAST_ROUND || round == WORLD2_LAST_ROUND
}

/// Multiplier for a streak of `combo` treasures: 1 + combo × 0.5.
pub fn combo_multiplier(combo: u32) -> f32 {
    1.0 + combo as f32 * 0.5
}

/// Score gained by a treasure hit that brought the streak to `combo`.
///
/// floor(100 × (1 + combo × 0.5)) computed exactly in integers.
pub fn treasure_score(combo: u32) -> u32 {
    TREASURE_BASE_SCORE.saturating_add(combo.saturating_mul(TREASURE_BASE_SCORE / 2))
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_one_rounds() {
        for round in 1..=5 {
            let d = difficulty_for(round);
            assert_eq!(d, Difficulty { grid_size: 9, treasure_count: 2, max_selections: 2, time_limit_secs: 10 });
        }
    }

    #[test]
    fn world_two_rounds() {
        for round in 6..=10 {
            let d = difficulty_for(round);
            assert_eq!(d, Difficulty { grid_size: 16, treasure_count: 3, max_selections: 3, time_limit_secs: 15 });
        }
    }

    #[test]
    fn world_three_rounds() {
        for round in [11, 12, 50, 999] {
            let d = difficulty_for(round);
            assert_eq!(d, Difficulty { grid_size: 25, treasure_count: 4, max_selections: 4, time_limit_secs: 18 });
        }
    }

    #[test]
    fn bonus_thresholds() {
        assert!(is_bonus_threshold(5));
        assert!(is_bonus_threshold(10));
        assert!(!is_bonus_threshold(4));
        assert!(!is_bonus_threshold(6));
        assert!(!is_bonus_threshold(15));
    }

    #[test]
    fn bonus_grid_follows_trigger_round() {
        assert_eq!(bonus_difficulty(5).grid_size, 9);
        assert_eq!(bonus_difficulty(10).grid_size, 16);
        let b = bonus_difficulty(5);
        assert_eq!(b.treasure_count, 6);
        assert_eq!(b.time_limit_secs, 10);
        assert_eq!(b.max_selections, UNLIMITED_SELECTIONS);
    }

    #[test]
    fn combo_law_matches_float_formula() {
        for n in 0..20u32 {
            let float = (100.0 * combo_multiplier(n)).floor() as u32;
            assert_eq!(treasure_score(n), float, "streak {n}");
        }
        assert_eq!(treasure_score(1), 150);
        assert_eq!(treasure_score(2), 200);
        assert_eq!(treasure_score(3), 250);
    }
}
