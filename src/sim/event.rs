/// Events emitted by session transitions.
/// The presentation layer consumes these for feedback and sound.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    SessionStarted,
    RoundStarted { round: u32 },
    TreasureFound { index: usize, gained: u32, multiplier: f32 },
    ExtraLifeFound { index: usize },
    ExtraScoreFound { index: usize, gained: u32 },
    Missed { index: usize },
    BonusTreasure { index: usize, gained: u32 },
    BonusMiss { index: usize },
    TimerTick { remaining: u32 },
    TimeUp,
    RoundSucceeded { round: u32 },
    RoundFailed { lives_left: u32 },
    GameOver { round: u32, score: u32 },
    BonusStarted { round: u32 },
    BonusEnded,
    ReturnedToMenu,
}
