/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::sim::leaderboard;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub gamepad: GamepadConfig,
    pub leaderboard_file: PathBuf,
    pub log_file: PathBuf,
    /// Fixed default player name; None = random `Player-NNNN`.
    pub player_name: Option<String>,
    pub sound_enabled: bool,
    /// Problem met while loading; logged once logging is up.
    pub load_warning: Option<String>,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Length of one countdown second.
    pub second_ms: u64,
    /// Presentation frame tick (flashes, messages).
    pub frame_ms: u64,
    /// Frames a bonus-round tile stays revealed after a click.
    pub flash_frames: u32,
}

impl TimingConfig {
    pub fn second(&self) -> Duration {
        Duration::from_millis(self.second_ms)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub select: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub leaderboard: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    sound: TomlSound,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_second_ms")]
    second_ms: u64,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_flash_frames")]
    flash_frames: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_select")]
    select: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_leaderboard")]
    leaderboard: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_leaderboard_file")]
    leaderboard_file: String,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default)]
    player_name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
}

// ── Defaults ──

fn default_second_ms() -> u64 { 1000 }
fn default_frame_ms() -> u64 { 50 }
fn default_flash_frames() -> u32 { 4 }   // ~200ms at 50ms frames

fn default_select() -> Vec<String> { vec!["A".into(), "X".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into(), "B".into()] }
fn default_leaderboard() -> Vec<String> { vec!["Y".into()] }

fn default_leaderboard_file() -> String { "leaderboard.dat".into() }
fn default_log_file() -> String { "treasure-grid.log".into() }
fn default_sound_enabled() -> bool { true }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            second_ms: default_second_ms(),
            frame_ms: default_frame_ms(),
            flash_frames: default_flash_frames(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            select: default_select(),
            confirm: default_confirm(),
            cancel: default_cancel(),
            leaderboard: default_leaderboard(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            leaderboard_file: default_leaderboard_file(),
            log_file: default_log_file(),
            player_name: None,
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound_enabled() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/treasure-grid.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let (toml_cfg, warning) = load_toml(&search_dirs);
        let mut cfg = Self::from_toml(toml_cfg);
        cfg.load_warning = warning;
        cfg
    }

    /// Parse config text directly (defaults for anything missing).
    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str::<TomlConfig>(text)
            .map(Self::from_toml)
            .map_err(|e| format!("config.toml parse error: {e}"))
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let player_name = toml_cfg.general.player_name
            .map(|n| n.trim().to_string())
            .filter(|n| leaderboard::is_storable_name(n));
        GameConfig {
            timing: TimingConfig {
                second_ms: toml_cfg.timing.second_ms.max(1),
                frame_ms: toml_cfg.timing.frame_ms.max(1),
                flash_frames: toml_cfg.timing.flash_frames,
            },
            gamepad: GamepadConfig {
                select: toml_cfg.gamepad.select,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                leaderboard: toml_cfg.gamepad.leaderboard,
            },
            leaderboard_file: PathBuf::from(toml_cfg.general.leaderboard_file),
            log_file: PathBuf::from(toml_cfg.general.log_file),
            player_name,
            sound_enabled: toml_cfg.sound.enabled,
            load_warning: None,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/treasure-grid)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/treasure-grid");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> (TomlConfig, Option<String>) {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return (cfg, None),
                    Err(e) => {
                        let msg = format!("config.toml parse error: {e}; using default settings");
                        return (TomlConfig::default(), Some(msg));
                    }
                },
                Err(e) => {
                    let msg = format!("could not read {}: {e}", path.display());
                    return (TomlConfig::default(), Some(msg));
                }
            }
        }
    }
    (TomlConfig::default(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.timing.second_ms, 1000);
        assert_eq!(cfg.timing.frame_ms, 50);
        assert_eq!(cfg.leaderboard_file, PathBuf::from("leaderboard.dat"));
        assert_eq!(cfg.player_name, None);
        assert!(cfg.sound_enabled);
        assert_eq!(cfg.gamepad.confirm, vec!["Start".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[timing]\nsecond_ms = 250\n\n[general]\nplayer_name = \"  Alice \"\n\n[sound]\nenabled = false\n",
        ).unwrap();
        assert_eq!(cfg.timing.second_ms, 250);
        assert_eq!(cfg.timing.flash_frames, 4);
        assert_eq!(cfg.player_name.as_deref(), Some("Alice"));
        assert!(!cfg.sound_enabled);
        assert_eq!(cfg.timing.second(), Duration::from_millis(250));
    }

    #[test]
    fn blank_player_name_is_ignored() {
        let cfg = GameConfig::parse("[general]\nplayer_name = \"   \"\n").unwrap();
        assert_eq!(cfg.player_name, None);
    }

    #[test]
    fn player_name_with_control_characters_is_ignored() {
        let cfg = GameConfig::parse("[general]\nplayer_name = \"Bob\\nEve=9999\"\n").unwrap();
        assert_eq!(cfg.player_name, None);
        let cfg = GameConfig::parse("[general]\nplayer_name = \"#1 Fan\"\n").unwrap();
        assert_eq!(cfg.player_name.as_deref(), Some("#1 Fan"));
    }

    #[test]
    fn zero_durations_are_clamped() {
        let cfg = GameConfig::parse("[timing]\nsecond_ms = 0\nframe_ms = 0\n").unwrap();
        assert_eq!(cfg.timing.second_ms, 1);
        assert_eq!(cfg.timing.frame_ms, 1);
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(GameConfig::parse("[timing\nsecond_ms = ").is_err());
    }
}
