/// Terminal input collector.
///
/// Drains crossterm events once per frame and sorts them into:
///   - fresh key presses (edge-triggered: tile picks, menu keys)
///   - left-button mouse clicks, as terminal (column, row)
///   - typed characters, for the name editor
///
/// Release events are ignored; a key counts once per Press/Repeat.
/// Auto-repeat is folded away by remembering keys seen within
/// `REPEAT_WINDOW`, so holding a key does not spam selections.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEventKind,
};

/// A key re-reported within this window is treated as auto-repeat.
const REPEAT_WINDOW: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of the last Press/Repeat for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys newly pressed during the most recent drain_events().
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Left clicks this frame, terminal cell coordinates.
    pub clicks: Vec<(u16, u16)>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            clicks: Vec::with_capacity(2),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.clicks.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => self.on_key(key),
                Ok(Event::Mouse(m)) => {
                    if let MouseEventKind::Down(MouseButton::Left) = m.kind {
                        self.clicks.push((m.column, m.row));
                    }
                }
                _ => {}
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < REPEAT_WINDOW);
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            self.last_active.remove(&key.code);
            return;
        }
        self.raw_events.push(key);
        let repeating = self.last_active
            .get(&key.code)
            .map(|t| t.elapsed() < REPEAT_WINDOW)
            .unwrap_or(false);
        self.last_active.insert(key.code, Instant::now());
        if !repeating {
            self.fresh_presses.push(key.code);
        }
    }

    /// Was this key freshly pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// First digit key 1-9 pressed this frame, as a 0-based index.
    pub fn digit_pressed(&self) -> Option<usize> {
        self.fresh_presses.iter().find_map(|code| match code {
            KeyCode::Char(c @ '1'..='9') => Some(*c as usize - '1' as usize),
            _ => None,
        })
    }

    /// Characters typed this frame (every event, repeats included).
    pub fn typed_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.raw_events.iter().filter_map(|k| match k.code {
            KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => Some(c),
            _ => None,
        })
    }

    /// Backspace presses this frame (every event, repeats included).
    pub fn backspaces(&self) -> usize {
        self.raw_events.iter().filter(|k| k.code == KeyCode::Backspace).count()
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
