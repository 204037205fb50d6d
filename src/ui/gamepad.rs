/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move tile cursor
///   A / X                 →  Select tile
///   Start                 →  Confirm (start / next round / retry)
///   Select / B            →  Back to menu / close overlay
///   Y                     →  Leaderboard
///
/// Without the `gamepad` feature every query returns false.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South        => Some(Btn::A),
            Button::East         => Some(Btn::B),
            Button::West         => Some(Btn::X),
            Button::North        => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start        => Some(Btn::Start),
            Button::Select       => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Cursor direction from D-pad or stick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    select: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    leaderboard: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            select:      vec![Btn::A, Btn::X],
            confirm:     vec![Btn::Start],
            cancel:      vec![Btn::Select, Btn::B],
            leaderboard: vec![Btn::Y],
        }
    }
}

fn parse_list(names: &[String]) -> Vec<Btn> {
    names.iter().filter_map(|s| Btn::from_name(s)).collect()
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last update (edge).
    just_pressed: [bool; BTN_COUNT],

    /// Directions pressed since the last update (edge).
    moves: Vec<Dir>,

    /// Stick position and which direction it currently leans.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick: (f32, f32),
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: Option<Dir>,

    action_map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs_opt = match Gilrs::new() {
            Ok(g) => {
                for (_, pad) in g.gamepads() {
                    log::info!("gamepad found: {}", pad.name());
                }
                Some(g)
            }
            Err(e) => {
                log::info!("gamepad support unavailable: {e}");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: [false; BTN_COUNT],
            moves: Vec::with_capacity(4),
            stick: (0.0, 0.0),
            stick_dir: None,
            action_map: ActionMap::default(),
        }
    }

    /// Load button mapping from config. Empty or unknown lists keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let map = &mut self.action_map;
        for (target, names) in [
            (&mut map.select, &cfg.select),
            (&mut map.confirm, &cfg.confirm),
            (&mut map.cancel, &cfg.cancel),
            (&mut map.leaderboard, &cfg.leaderboard),
        ] {
            let parsed = parse_list(names);
            if parsed.is_empty() {
                log::warn!("no usable gamepad buttons in {names:?}; keeping default");
            } else {
                *target = parsed;
            }
        }
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.moves.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.press(btn),
                EventType::AxisChanged(axis, value, _) => {
                    match axis {
                        Axis::LeftStickX => self.stick.0 = value,
                        Axis::LeftStickY => self.stick.1 = value,
                        _ => {}
                    }
                }
                EventType::Connected => log::info!("gamepad connected"),
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.stick = (0.0, 0.0);
                    self.stick_dir = None;
                }
                _ => {}
            }
        }

        // Stick acts like a D-pad: one move per lean past the deadzone
        let (x, y) = self.stick;
        let dir = if x < -STICK_DEADZONE {
            Some(Dir::Left)
        } else if x > STICK_DEADZONE {
            Some(Dir::Right)
        } else if y > STICK_DEADZONE {
            Some(Dir::Up)
        } else if y < -STICK_DEADZONE {
            Some(Dir::Down)
        } else {
            None
        };
        if dir != self.stick_dir {
            if let Some(d) = dir {
                self.moves.push(d);
            }
            self.stick_dir = dir;
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, gilrs_btn: Button) {
        match gilrs_btn {
            Button::DPadUp    => self.moves.push(Dir::Up),
            Button::DPadDown  => self.moves.push(Dir::Down),
            Button::DPadLeft  => self.moves.push(Dir::Left),
            Button::DPadRight => self.moves.push(Dir::Right),
            other => {
                if let Some(btn) = Btn::from_gilrs(other) {
                    self.just_pressed[btn as usize] = true;
                }
            }
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    pub fn select_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.select)
    }
    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }
    pub fn leaderboard_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.leaderboard)
    }

    /// Cursor moves requested since the last update.
    pub fn moves(&self) -> &[Dir] {
        &self.moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("Z"), None);
    }

    #[test]
    fn config_replaces_mapping_but_ignores_unknown_lists() {
        let mut pad = GamepadState::new();
        pad.load_button_config(&GamepadConfig {
            select: vec!["B".into()],
            confirm: vec!["bogus".into()],
            cancel: vec![],
            leaderboard: vec!["L1".into(), "R1".into()],
        });
        assert_eq!(pad.action_map.select, vec![Btn::B]);
        assert_eq!(pad.action_map.confirm, vec![Btn::Start]);
        assert_eq!(pad.action_map.cancel, vec![Btn::Select, Btn::B]);
        assert_eq!(pad.action_map.leaderboard, vec![Btn::L1, Btn::R1]);
    }

    #[test]
    fn queries_follow_pressed_buttons() {
        let mut pad = GamepadState::new();
        pad.just_pressed[Btn::X as usize] = true;
        assert!(pad.select_pressed());
        assert!(!pad.confirm_pressed());
        pad.update();
        assert!(!pad.select_pressed());
        assert!(pad.moves().is_empty());
    }
}
