/// Score, lives and combo tracking.

use super::rules::{self, EXTRA_SCORE_BONUS, STARTING_LIVES};
use super::tile::TileKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionStats {
    pub score: u32,
    pub lives: u32,
    /// Consecutive treasure hits without a blank in between.
    pub combo: u32,
}

/// What a single normal-round hit did to the stats.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Hit {
    Treasure { gained: u32, multiplier: f32 },
    ExtraLife,
    ExtraScore { gained: u32 },
    Miss,
}

impl SessionStats {
    pub fn new() -> Self {
        SessionStats { score: 0, lives: STARTING_LIVES, combo: 0 }
    }

    pub fn combo_multiplier(&self) -> f32 {
        rules::combo_multiplier(self.combo)
    }

    /// Apply the effect of selecting a tile of `kind`.
    pub fn apply_hit(&mut self, kind: TileKind) -> Hit {
        match kind {
            TileKind::Treasure => {
                self.combo = self.combo.saturating_add(1);
                let gained = rules::treasure_score(self.combo);
                self.score = self.score.saturating_add(gained);
                Hit::Treasure { gained, multiplier: self.combo_multiplier() }
            }
            TileKind::ExtraLife => {
                self.lives = self.lives.saturating_add(1);
                Hit::ExtraLife
            }
            TileKind::ExtraScore => {
                self.score = self.score.saturating_add(EXTRA_SCORE_BONUS);
                Hit::ExtraScore { gained: EXTRA_SCORE_BONUS }
            }
            TileKind::Blank => {
                self.combo = 0;
                Hit::Miss
            }
        }
    }

    /// Flat bonus-round award; combo is not involved.
    pub fn add_flat(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Lose one life. Returns true when no lives are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.is_out()
    }

    pub fn is_out(&self) -> bool {
        self.lives == 0
    }

    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
