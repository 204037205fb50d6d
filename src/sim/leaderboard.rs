/// Local leaderboard: best score per player name.
///
/// ## File format
///   One `name=score` line per player, in registration order. The name
///   is everything before the *last* `=`, so names may contain `=` or
///   `#`. Names never contain control characters (see `is_storable_name`).
///   Blank lines are ignored; malformed lines are skipped with a warning.
///
/// ## Ranking
///   Descending by score. Equal scores keep registration order
///   (earliest registered first), since the sort is stable over the
///   file order.
///
/// Entries are only ever created or raised, never deleted.

use std::path::{Path, PathBuf};

/// Number of rows shown in the ranked view.
pub const TOP_N: usize = 10;

/// Rank shown for a player with no entry.
pub const UNRANKED: usize = 999;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player: String,
    pub best_score: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Leaderboard {
    /// Registration order.
    entries: Vec<LeaderboardEntry>,
    /// Backing file. None = in-memory only.
    path: Option<PathBuf>,
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

/// Directory for the leaderboard and the log file.
pub fn data_dir() -> PathBuf {
    // 1. Exe directory, if writable (portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let test_path = parent.join(".write_test_treasure_grid");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/treasure-grid");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolve a configured file name: absolute paths are kept,
/// relative ones land in `data_dir()`.
pub fn resolve_path(name: &Path) -> PathBuf {
    if name.is_absolute() {
        name.to_path_buf()
    } else {
        data_dir().join(name)
    }
}

// ══════════════════════════════════════════════════════════════
// Store
// ══════════════════════════════════════════════════════════════

impl Leaderboard {
    /// Empty leaderboard that is never written to disk.
    pub fn in_memory() -> Self {
        Leaderboard { entries: vec![], path: None }
    }

    /// Load from `path`. A missing or unreadable file gives an empty board
    /// that will be created on the first save.
    pub fn load(path: PathBuf) -> Self {
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => vec![],
            Err(e) => {
                log::warn!("could not read leaderboard {}: {e}", path.display());
                vec![]
            }
        };
        log::info!("loaded {} leaderboard entries from {}", entries.len(), path.display());
        Leaderboard { entries, path: Some(path) }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored best score for `player`.
    pub fn best_score(&self, player: &str) -> Option<u32> {
        self.entries.iter().find(|e| e.player == player).map(|e| e.best_score)
    }

    /// Record a finished session's score. Only writes when `score`
    /// beats the stored score (a missing entry counts as 0).
    /// Returns true if the board changed.
    pub fn record(&mut self, player: &str, score: u32) -> bool {
        if !is_storable_name(player) {
            log::warn!("refusing leaderboard entry for unstorable name {player:?}");
            return false;
        }
        let existing = self.best_score(player).unwrap_or(0);
        if score <= existing {
            return false;
        }
        match self.entries.iter_mut().find(|e| e.player == player) {
            Some(entry) => entry.best_score = score,
            None => self.entries.push(LeaderboardEntry {
                player: player.to_string(),
                best_score: score,
            }),
        }
        log::info!("new best for {player}: {score} (was {existing})");
        true
    }

    /// All entries ranked: score descending, ties by registration order.
    pub fn ranked(&self) -> Vec<&LeaderboardEntry> {
        let mut ranked: Vec<&LeaderboardEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.best_score.cmp(&a.best_score));
        ranked
    }

    /// The first `TOP_N` ranked entries.
    pub fn top(&self) -> Vec<&LeaderboardEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(TOP_N);
        ranked
    }

    /// 1-based rank and entry of `player`, if registered.
    pub fn rank_of(&self, player: &str) -> Option<(usize, &LeaderboardEntry)> {
        self.ranked()
            .into_iter()
            .enumerate()
            .find(|(_, e)| e.player == player)
            .map(|(i, e)| (i + 1, e))
    }

    /// Write the board to its file. No-op for in-memory boards.
    pub fn save(&self) -> Result<(), String> {
        let Some(path) = &self.path else { return Ok(()) };
        std::fs::write(path, serialize(&self.entries))
            .map_err(|e| format!("Leaderboard save to {} failed: {}", path.display(), e))
    }
}

// ══════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════

/// A name survives a save/load cycle: non-blank and free of control
/// characters (a newline would split the line).
pub fn is_storable_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.chars().any(char::is_control)
}

fn serialize(entries: &[LeaderboardEntry]) -> String {
    let mut out = String::with_capacity(entries.len() * 24);
    for e in entries {
        out.push_str(&format!("{}={}\n", e.player, e.best_score));
    }
    out
}

fn parse(content: &str) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = vec![];
    for (n, line) in content.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, score)) = line.rsplit_once('=') else {
            log::warn!("leaderboard line {}: missing '='", n + 1);
            continue;
        };
        let Ok(score) = score.trim().parse::<u32>() else {
            log::warn!("leaderboard line {}: bad score {score:?}", n + 1);
            continue;
        };
        if name.is_empty() {
            continue;
        }
        // Duplicate names keep the first position and the higher score
        match entries.iter_mut().find(|e| e.player == name) {
            Some(e) => e.best_score = e.best_score.max(score),
            None => entries.push(LeaderboardEntry { player: name.to_string(), best_score: score }),
        }
    }
    entries
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn board(pairs: &[(&str, u32)]) -> Leaderboard {
        let mut b = Leaderboard::in_memory();
        for &(p, s) in pairs {
            b.record(p, s);
        }
        b
    }

    #[test]
    fn empty_board_has_no_ranking() {
        let b = Leaderboard::in_memory();
        assert!(b.is_empty());
        assert!(b.top().is_empty());
        assert_eq!(b.rank_of("anyone"), None);
    }

    #[test]
    fn lower_score_is_not_stored() {
        let mut b = board(&[("Alice", 500)]);
        assert!(!b.record("Alice", 450));
        assert_eq!(b.best_score("Alice"), Some(500));
        assert!(!b.record("Alice", 500));
        assert!(b.record("Alice", 501));
        assert_eq!(b.best_score("Alice"), Some(501));
    }

    #[test]
    fn zero_score_never_registers() {
        let mut b = Leaderboard::in_memory();
        assert!(!b.record("Bob", 0));
        assert!(b.is_empty());
    }

    #[test]
    fn ranking_is_descending_with_registration_tiebreak() {
        let b = board(&[("a", 300), ("b", 500), ("c", 300), ("d", 900)]);
        let names: Vec<&str> = b.ranked().iter().map(|e| e.player.as_str()).collect();
        assert_eq!(names, vec!["d", "b", "a", "c"]);
        assert_eq!(b.rank_of("c").map(|(r, _)| r), Some(4));
    }

    #[test]
    fn top_is_capped_at_ten() {
        let pairs: Vec<(String, u32)> = (1..=15).map(|i| (format!("p{i}"), i * 10)).collect();
        let mut b = Leaderboard::in_memory();
        for (p, s) in &pairs {
            b.record(p, *s);
        }
        let top = b.top();
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0].player, "p15");
        assert_eq!(top[9].player, "p6");
        assert_eq!(b.rank_of("p1").map(|(r, _)| r), Some(15));
    }

    #[test]
    fn raising_a_score_keeps_registration_slot() {
        let mut b = board(&[("a", 100), ("b", 200)]);
        b.record("a", 200);
        let names: Vec<&str> = b.ranked().iter().map(|e| e.player.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn parse_skips_bad_lines_and_splits_on_last_equals() {
        let entries = parse("#1 Fan=12\nx=y=40\nbroken\nz=abc\n\nq=7\nq=3\n");
        assert_eq!(entries, vec![
            LeaderboardEntry { player: "#1 Fan".into(), best_score: 12 },
            LeaderboardEntry { player: "x=y".into(), best_score: 40 },
            LeaderboardEntry { player: "q".into(), best_score: 7 },
        ]);
    }

    #[test]
    fn serialize_then_parse_preserves_order() {
        let b = board(&[("Player-12", 450), ("Alice", 900)]);
        let text = serialize(&b.entries);
        assert_eq!(text, "Player-12=450\nAlice=900\n");
        assert_eq!(parse(&text), b.entries);
    }

    #[test]
    fn save_and_load_through_file() {
        let dir = std::env::temp_dir().join(format!("treasure-grid-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("leaderboard.dat");
        let _ = std::fs::remove_file(&path);

        let mut b = Leaderboard::load(path.clone());
        assert!(b.is_empty());
        b.record("Alice", 500);
        b.save().unwrap();

        let reloaded = Leaderboard::load(path.clone());
        assert_eq!(reloaded.best_score("Alice"), Some(500));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn hash_names_survive_reload() {
        let dir = std::env::temp_dir().join(format!("treasure-grid-hash-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("leaderboard.dat");
        let _ = std::fs::remove_file(&path);

        let mut b = Leaderboard::load(path.clone());
        assert!(b.record("#1 Fan", 500));
        assert!(!b.record("Bob\nEve=9999", 10));
        b.save().unwrap();

        let reloaded = Leaderboard::load(path.clone());
        assert_eq!(reloaded.best_score("#1 Fan"), Some(500));
        assert_eq!(reloaded.best_score("Eve"), None);
        assert_eq!(reloaded.ranked().len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn storable_names_reject_control_characters() {
        assert!(is_storable_name("Player-42"));
        assert!(is_storable_name("#1 Fan"));
        assert!(!is_storable_name("Bob\nEve"));
        assert!(!is_storable_name("tab\there"));
        assert!(!is_storable_name("   "));
    }

    #[test]
    fn in_memory_save_is_noop() {
        let b = board(&[("a", 1)]);
        assert!(b.save().is_ok());
    }
}
