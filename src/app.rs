/// Application state around the session: cursor, overlays, player name,
/// transient messages and the leaderboard.
///
/// Input adapters translate keys, clicks and pad buttons into `Action`s;
/// `App::handle` routes them to the round controller and feeds the
/// resulting events back through `App::absorb`.

use rand::Rng;

use crate::domain::tile::TileKind;
use crate::sim::event::GameEvent;
use crate::sim::leaderboard::{self, Leaderboard};
use crate::sim::session::{Phase, Session};
use crate::sim::step;
use crate::ui::gamepad::Dir;

/// Longest accepted player name, in characters.
pub const NAME_MAX_CHARS: usize = 16;

/// Frames a message stays on screen.
const MESSAGE_FRAMES: u32 = 30;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Overlay {
    None,
    Leaderboard,
    Instructions,
    NameEdit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    /// Enter / Start: start, next round, retry, play again, pick cursor tile.
    Confirm,
    /// Esc / Select: close overlay, or abandon the session.
    Back,
    /// Pick a tile by index (number keys, mouse).
    Select(usize),
    /// Pick the tile under the cursor (Space, pad A).
    SelectCursor,
    Move(Dir),
    ToggleLeaderboard,
    ToggleInstructions,
    EditName,
    Type(char),
    Erase,
}

/// Tile briefly shown after a bonus-round click.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Flash {
    pub index: usize,
    pub kind: TileKind,
    pub frames_left: u32,
}

pub struct App {
    pub session: Session,
    pub leaderboard: Leaderboard,
    pub player_name: String,
    pub name_draft: String,
    pub overlay: Overlay,
    pub cursor: usize,
    pub message: String,
    pub message_timer: u32,
    pub flashes: Vec<Flash>,
    /// Most recent normal-round pick, highlighted until the next round.
    pub last_pick: Option<usize>,
    pub anim_tick: u32,
    /// The last finished session raised the player's best score.
    pub new_best: bool,
    flash_frames: u32,
}

/// `Player-NNNN` with NNNN in [0, 10000).
pub fn random_player_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("Player-{}", rng.random_range(0..10000))
}

impl App {
    pub fn new(session: Session, leaderboard: Leaderboard, player_name: String, flash_frames: u32) -> Self {
        App {
            session,
            leaderboard,
            player_name,
            name_draft: String::new(),
            overlay: Overlay::None,
            cursor: 0,
            message: String::new(),
            message_timer: 0,
            flashes: vec![],
            last_pick: None,
            anim_tick: 0,
            new_best: false,
            flash_frames,
        }
    }

    // ── Input ──

    /// Apply one user action. Returns the session events it caused.
    pub fn handle(&mut self, action: Action) -> Vec<GameEvent> {
        if self.overlay != Overlay::None {
            self.handle_overlay(action);
            return vec![];
        }

        let events = match (self.session.phase, action) {
            (Phase::Menu, Action::Confirm) | (Phase::GameOver, Action::Confirm) => {
                step::start_session(&mut self.session)
            }
            (Phase::Menu, Action::EditName) => {
                self.name_draft = self.player_name.clone();
                self.overlay = Overlay::NameEdit;
                vec![]
            }
            (Phase::Menu | Phase::GameOver, Action::ToggleLeaderboard) => {
                self.overlay = Overlay::Leaderboard;
                vec![]
            }
            (Phase::Menu, Action::ToggleInstructions) => {
                self.overlay = Overlay::Instructions;
                vec![]
            }
            (Phase::Menu, _) => vec![],

            (Phase::RoundCleared, Action::Confirm) => step::next_round(&mut self.session),
            (Phase::RoundFailed, Action::Confirm) => step::retry_round(&mut self.session),

            (Phase::Playing | Phase::Bonus, Action::Confirm | Action::SelectCursor) => {
                step::select_tile(&mut self.session, self.cursor)
            }
            (Phase::Playing | Phase::Bonus, Action::Select(index)) => {
                if index < self.session.tiles.len() {
                    self.cursor = index;
                }
                step::select_tile(&mut self.session, index)
            }
            (Phase::Playing | Phase::Bonus, Action::Move(dir)) => {
                self.move_cursor(dir);
                vec![]
            }

            (_, Action::Back) => step::restart(&mut self.session),
            _ => vec![],
        };
        self.absorb(&events);
        events
    }

    fn handle_overlay(&mut self, action: Action) {
        match (self.overlay, action) {
            (Overlay::NameEdit, Action::Type(c)) => {
                if !c.is_control() && self.name_draft.chars().count() < NAME_MAX_CHARS {
                    self.name_draft.push(c);
                }
            }
            (Overlay::NameEdit, Action::Erase) => {
                self.name_draft.pop();
            }
            (Overlay::NameEdit, Action::Confirm) => {
                let name = self.name_draft.trim();
                if !leaderboard::is_storable_name(name) {
                    self.show_message("Name cannot be empty");
                    return;
                }
                self.player_name = name.to_string();
                log::info!("player name set to {}", self.player_name);
                self.overlay = Overlay::None;
            }
            (Overlay::NameEdit, Action::Back) => self.overlay = Overlay::None,
            (Overlay::NameEdit, _) => {}

            (Overlay::Leaderboard, Action::ToggleLeaderboard)
            | (Overlay::Instructions, Action::ToggleInstructions)
            | (_, Action::Back | Action::Confirm) => self.overlay = Overlay::None,
            _ => {}
        }
    }

    fn move_cursor(&mut self, dir: Dir) {
        let side = self.session.tiles.side().max(1);
        let len = self.session.tiles.len();
        let (row, col) = (self.cursor / side, self.cursor % side);
        let (row, col) = match dir {
            Dir::Up => (row.saturating_sub(1), col),
            Dir::Down => ((row + 1).min(side - 1), col),
            Dir::Left => (row, col.saturating_sub(1)),
            Dir::Right => (row, (col + 1).min(side - 1)),
        };
        self.cursor = (row * side + col).min(len.saturating_sub(1));
    }

    // ── Events ──

    /// Update presentation state and the leaderboard from session events.
    pub fn absorb(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::SessionStarted => self.new_best = false,
                GameEvent::RoundStarted { .. } => {
                    self.flashes.clear();
                    self.last_pick = None;
                    if self.cursor >= self.session.tiles.len() {
                        self.cursor = 0;
                    }
                }
                GameEvent::TreasureFound { index, gained, multiplier } => {
                    self.last_pick = Some(index);
                    self.show_message(&format!("🔥 +{gained} XP (x{multiplier:.1})"));
                }
                GameEvent::ExtraLifeFound { index } => {
                    self.last_pick = Some(index);
                    self.show_message("+1 life!");
                }
                GameEvent::ExtraScoreFound { index, gained } => {
                    self.last_pick = Some(index);
                    self.show_message(&format!("+{gained} XP bonus!"));
                }
                GameEvent::Missed { index } => {
                    self.last_pick = Some(index);
                    self.show_message("Nothing here");
                }
                GameEvent::BonusTreasure { index, gained } => {
                    self.flash(index, TileKind::Treasure);
                    self.show_message(&format!("+{gained} XP"));
                }
                GameEvent::BonusMiss { index } => self.flash(index, TileKind::Blank),
                GameEvent::TimeUp => self.show_message("Time's up!"),
                GameEvent::BonusStarted { round } => {
                    self.cursor = 0;
                    self.last_pick = None;
                    self.show_message(&format!("BONUS ROUND after round {round}! Grab what you can"));
                }
                GameEvent::BonusEnded => self.show_message("Bonus round over! XP earned"),
                GameEvent::RoundSucceeded { round } => {
                    log::debug!("round {round} cleared with {} picks", self.session.round.selections_made);
                }
                GameEvent::RoundFailed { lives_left } => {
                    self.show_message(&format!("No treasure found. Lives left: {lives_left}"));
                }
                GameEvent::GameOver { round, score } => {
                    log::info!("{} finished at round {round} with {score} XP", self.player_name);
                    self.record_score(score);
                }
                GameEvent::ReturnedToMenu => {
                    self.flashes.clear();
                    self.last_pick = None;
                    self.cursor = 0;
                }
                GameEvent::TimerTick { .. } => {}
            }
        }
    }

    fn record_score(&mut self, score: u32) {
        self.new_best = self.leaderboard.record(&self.player_name, score);
        if self.new_best {
            if let Err(e) = self.leaderboard.save() {
                log::warn!("{e}");
                self.show_message("Could not save the leaderboard");
            }
        }
    }

    fn flash(&mut self, index: usize, kind: TileKind) {
        self.flashes.retain(|f| f.index != index);
        self.flashes.push(Flash { index, kind, frames_left: self.flash_frames });
    }

    pub fn show_message(&mut self, text: &str) {
        self.message = text.to_string();
        self.message_timer = MESSAGE_FRAMES;
    }

    /// Flash shown on `index`, if any.
    pub fn flash_at(&self, index: usize) -> Option<TileKind> {
        self.flashes.iter().find(|f| f.index == index).map(|f| f.kind)
    }

    /// Advance presentation timers by one frame.
    pub fn frame_tick(&mut self) {
        self.anim_tick = self.anim_tick.wrapping_add(1);
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
        for f in &mut self.flashes {
            f.frames_left = f.frames_left.saturating_sub(1);
        }
        self.flashes.retain(|f| f.frames_left > 0);
    }
}
