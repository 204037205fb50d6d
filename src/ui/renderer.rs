/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Tile rectangles from the last composed grid are kept so mouse clicks
/// can be mapped back to tile indices with `tile_at()`.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::app::{App, Overlay};
use crate::domain::rules::{self, World};
use crate::domain::tile::TileKind;
use crate::sim::leaderboard::UNRANKED;
use crate::sim::session::{Mode, Phase};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 8],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit background for every "empty" cell. Using the same RGB for
    /// `Clear(ClearType::All)` keeps VTE inter-row gaps the same color.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 8],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel used to invalidate the back buffer (differs from any real cell).
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, bg: Color) -> Self {
        let mut cell = Self::from_char(c, Color::Reset, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// Write a 2-column emoji at (x, y).
    fn put_wide(&mut self, x: usize, y: usize, ch: char, bg: Color) {
        if x + 1 < self.width {
            self.set(x, y, Cell::from_char_wide(ch, bg));
            self.set(x + 1, y, Cell::WIDE_CONT);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, Cell::from_char(' ', Color::White, bg));
            }
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        let w = self.width;
        self.fill_rect(0, y, w, 1, bg);
    }
}

// ── Layout ──

const HUD_ROW: usize = 0;
const GRID_ROW: usize = 3;
const GRID_COL: usize = 4;

/// One tile on screen: 8 columns × 3 rows plus a 1-cell gap.
const TILE_W: usize = 8;
const TILE_H: usize = 3;
const TILE_GAP: usize = 1;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const RED: Color = Color::Rgb { r: 255, g: 80, b: 80 };
const PANEL_BG: Color = Color::Rgb { r: 40, g: 40, b: 55 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TileRect {
    x: usize,
    y: usize,
    index: usize,
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_view: Option<(Phase, Overlay)>,
    tile_rects: Vec<TileRect>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_view: None,
            tile_rects: vec![],
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Tile index under terminal cell (col, row) in the last frame.
    pub fn tile_at(&self, col: u16, row: u16) -> Option<usize> {
        hit_test(&self.tile_rects, col as usize, row as usize)
    }

    pub fn render(&mut self, app: &App) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Screen change → full repaint for a clean transition
        let view = (app.session.phase, app.overlay);
        if self.last_view != Some(view) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_view = Some(view);
        }

        self.front.clear();
        self.tile_rects.clear();

        match app.session.mode() {
            Mode::Menu => self.compose_menu(app),
            Mode::Normal | Mode::Bonus | Mode::GameOver => self.compose_game(app),
        }
        match app.session.phase {
            Phase::RoundCleared => self.compose_round_cleared(app),
            Phase::RoundFailed => self.compose_round_failed(app),
            Phase::GameOver => self.compose_game_over(app),
            _ => {}
        }
        match app.overlay {
            Overlay::None => {}
            Overlay::Leaderboard => self.compose_leaderboard(app),
            Overlay::Instructions => self.compose_instructions(),
            Overlay::NameEdit => self.compose_name_edit(app),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Menu ──

    fn compose_menu(&mut self, app: &App) {
        let title = [
            r"  ___ _         _   _   _          _____                                 ",
            r" | __(_)_ _  __| | | |_| |_  ___  |_   _| _ ___ __ _ ____  _ _ _ ___     ",
            r" | _|| | ' \/ _` | |  _| ' \/ -_)   | || '_/ -_) _` (_-< || | '_/ -_)    ",
            r" |_| |_|_||_\__,_|  \__|_||_\___|   |_||_| \___\__,_/__/\_,_|_| \___|    ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 2 + i, line, GOLD, Color::Reset);
        }

        let who = format!("Playing as: {}", app.player_name);
        self.front.put_str(8, 8, &who, GREEN, Color::Reset);

        let menu_base = 10;
        let items = [
            ("ENTER", "Start game"),
            ("  L  ", "Leaderboard"),
            ("  I  ", "How to play"),
            ("  N  ", "Change name"),
            ("  Q  ", "Quit"),
        ];
        for (i, (key, label)) in items.iter().enumerate() {
            let fg = if i == 0 { GREEN } else { Color::White };
            self.front.put_str(8, menu_base + i, &format!("{key}   {label}"), fg, Color::Reset);
        }

        let pad = "Pad: Start = play   Y = leaderboard   Select = back";
        self.front.put_str(8, menu_base + items.len() + 1, pad, Color::DarkGrey, Color::Reset);

        self.compose_message(app, self.front.height.saturating_sub(1));
    }

    // ── Playing screen ──

    fn compose_game(&mut self, app: &App) {
        let s = &app.session;
        let bonus = s.mode() == Mode::Bonus;

        // HUD
        let round = if bonus { "BONUS".to_string() } else { s.round.round.to_string() };
        let selections = if s.round.is_unlimited() {
            "∞".to_string()
        } else {
            format!("{}/{}", s.round.selections_made, s.round.max_selections)
        };
        let hud = format!(
            " Round {:<5}  XP {:<7}  ♥×{}  Picks {:<5}  Time {:>2}s ",
            round, s.stats.score, s.stats.lives, selections, s.time_remaining(),
        );
        let hud_bg = if bonus { Color::Rgb { r: 120, g: 70, b: 0 } } else { HUD_BG };
        self.front.fill_row(HUD_ROW, hud_bg);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, hud_bg);

        if s.stats.combo >= 2 && !bonus {
            let combo = format!("🔥 combo ×{:.1}", s.stats.combo_multiplier());
            self.front.put_str(1, HUD_ROW + 1, &combo, GOLD, Color::Reset);
        }

        // Grid
        let side = s.tiles.side().max(1);
        let accent = world_accent(World::of_round(s.round.round), bonus);
        for index in 0..s.tiles.len() {
            let (r, c) = (index / side, index % side);
            let x = GRID_COL + c * (TILE_W + TILE_GAP);
            let y = GRID_ROW + r * (TILE_H + TILE_GAP);
            self.compose_tile(app, index, x, y, accent);
            self.tile_rects.push(TileRect { x, y, index });
        }

        let below = GRID_ROW + side * (TILE_H + TILE_GAP);
        self.compose_message(app, below);

        let help_row = below + 2;
        if help_row < self.front.height {
            let help = if side == 3 {
                " ←→↑↓/WASD move  ENTER/SPACE pick  1-9 pick  click  ESC menu"
            } else {
                " ←→↑↓/WASD move  ENTER/SPACE pick  click  ESC menu"
            };
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_tile(&mut self, app: &App, index: usize, x: usize, y: usize, accent: Color) {
        let s = &app.session;
        let shown = app.flash_at(index).or_else(|| s.revealed(index));
        let is_cursor = s.phase.accepts_tiles() && app.cursor == index;

        let bg = match shown {
            Some(TileKind::Treasure) => Color::Rgb { r: 90, g: 70, b: 10 },
            Some(TileKind::ExtraLife) => Color::Rgb { r: 90, g: 20, b: 40 },
            Some(TileKind::ExtraScore) => Color::Rgb { r: 20, g: 60, b: 90 },
            Some(TileKind::Blank) => Color::Rgb { r: 50, g: 50, b: 50 },
            None => accent,
        };
        self.front.fill_rect(x, y, TILE_W, TILE_H, bg);

        let mid_x = x + TILE_W / 2 - 1;
        match shown {
            Some(TileKind::Treasure) => self.front.put_wide(mid_x, y + 1, '💰', bg),
            Some(TileKind::ExtraLife) => self.front.put_wide(mid_x, y + 1, '💖', bg),
            Some(TileKind::ExtraScore) => self.front.put_wide(mid_x, y + 1, '⭐', bg),
            Some(TileKind::Blank) => self.front.put_str(mid_x, y + 1, "✗✗", RED, bg),
            None => {
                if s.tiles.side() == 3 {
                    let label = (index + 1).to_string();
                    self.front.put_str(x + 1, y, &label, Color::Grey, bg);
                }
                self.front.put_str(mid_x, y + 1, "??", Color::Grey, bg);
            }
        }

        if app.last_pick == Some(index) && shown.is_some() {
            self.front.put_str(x, y + TILE_H - 1, "◆", GOLD, bg);
            self.front.put_str(x + TILE_W - 1, y + TILE_H - 1, "◆", GOLD, bg);
        }

        if is_cursor {
            let fg = if (app.anim_tick / 6) % 2 == 0 { GOLD } else { Color::White };
            self.front.put_str(x, y + TILE_H - 1, "▔▔▔▔▔▔▔▔", fg, bg);
            self.front.put_str(x, y, "▛", fg, bg);
            self.front.put_str(x + TILE_W - 1, y, "▜", fg, bg);
        }
    }

    fn compose_message(&mut self, app: &App, row: usize) {
        if app.message.is_empty() || row >= self.front.height {
            return;
        }
        self.front.fill_row(row, MSG_BG);
        self.front.put_str(0, row, &format!(" ◈ {} ", app.message), Color::Black, MSG_BG);
    }

    // ── Modals ──

    fn modal_box(&mut self, lines: &[(String, Color)], border: Color) {
        let box_w = lines.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0) + 6;
        let box_h = lines.len() + 4;
        let box_x = (self.front.width.saturating_sub(box_w)) / 2;
        let box_y = GRID_ROW + 1;

        self.front.fill_rect(box_x, box_y, box_w, box_h, PANEL_BG);
        let horiz: String = "═".repeat(box_w.saturating_sub(2));
        self.front.put_str(box_x, box_y, &format!("╔{horiz}╗"), border, PANEL_BG);
        self.front.put_str(box_x, box_y + box_h - 1, &format!("╚{horiz}╝"), border, PANEL_BG);
        for yy in box_y + 1..box_y + box_h - 1 {
            self.front.put_str(box_x, yy, "║", border, PANEL_BG);
            self.front.put_str(box_x + box_w - 1, yy, "║", border, PANEL_BG);
        }
        for (i, (line, fg)) in lines.iter().enumerate() {
            self.front.put_str(box_x + 3, box_y + 2 + i, line, *fg, PANEL_BG);
        }
    }

    fn compose_round_cleared(&mut self, app: &App) {
        let s = &app.session;
        let next = if rules::is_bonus_threshold(s.round.round) {
            "▸ ENTER: Bonus round!"
        } else {
            "▸ ENTER: Next round"
        };
        self.modal_box(&[
            (format!("★ Round {} cleared! ★", s.round.round), GOLD),
            (String::new(), Color::White),
            (format!("XP     {}", s.stats.score), Color::White),
            (format!("Lives  {}", s.stats.lives), Color::White),
            (String::new(), Color::White),
            (next.to_string(), GREEN),
            ("▸ ESC:   Menu".to_string(), Color::DarkGrey),
        ], GOLD);
    }

    fn compose_round_failed(&mut self, app: &App) {
        let s = &app.session;
        self.modal_box(&[
            (format!("✕ Round {} failed ✕", s.round.round), RED),
            (String::new(), Color::White),
            (format!("XP     {}", s.stats.score), Color::White),
            (format!("Lives  {}", s.stats.lives), Color::White),
            (String::new(), Color::White),
            ("▸ ENTER: Retry".to_string(), GREEN),
            ("▸ ESC:   Menu".to_string(), Color::DarkGrey),
        ], RED);
    }

    fn compose_game_over(&mut self, app: &App) {
        let s = &app.session;
        let best = if app.new_best {
            ("New personal best!".to_string(), GREEN)
        } else {
            (String::new(), Color::White)
        };
        self.modal_box(&[
            ("✕  GAME  OVER  ✕".to_string(), RED),
            (String::new(), Color::White),
            (format!("Final XP       {}", s.stats.score), Color::White),
            (format!("Reached round  {}", s.round.round), Color::White),
            best,
            (String::new(), Color::White),
            ("▸ ENTER: Play again".to_string(), GREEN),
            ("▸ L:     Leaderboard".to_string(), Color::White),
            ("▸ ESC:   Menu".to_string(), Color::DarkGrey),
        ], RED);
    }

    // ── Overlays ──

    fn compose_leaderboard(&mut self, app: &App) {
        let lines = leaderboard_lines(app);
        let mut rows: Vec<(String, Color)> = vec![
            ("🏆 Leaderboard".to_string(), GOLD),
            (String::new(), Color::White),
        ];
        rows.extend(lines.top.into_iter().map(|l| (l, Color::White)));
        rows.push(("─".repeat(28), Color::DarkGrey));
        rows.push((lines.player, GREEN));
        rows.push((String::new(), Color::White));
        rows.push(("▸ ESC / L: Close".to_string(), Color::DarkGrey));
        self.modal_box(&rows, GOLD);
    }

    fn compose_instructions(&mut self) {
        let text = [
            "How to play",
            "",
            "Pick tiles to find the hidden treasure before time runs out.",
            "Each round gives you a limited number of picks.",
            "",
            "💰 Treasure     100 XP, more for every treasure in a row",
            "💖 Extra life   +1 life (also counts as a find)",
            "⭐ Extra XP     +250 XP",
            "",
            "Find nothing and you lose a life. No lives left: game over.",
            "Rounds 1-5 use a 3×3 grid, 6-10 a 4×4 grid, then 5×5.",
            "After rounds 5 and 10 comes a bonus round: 10 seconds,",
            "unlimited picks, and the treasure moves after every pick.",
            "",
            "▸ ESC / I: Close",
        ];
        let rows: Vec<(String, Color)> = text
            .iter()
            .enumerate()
            .map(|(i, l)| (l.to_string(), if i == 0 { GOLD } else { Color::White }))
            .collect();
        self.modal_box(&rows, Color::Rgb { r: 100, g: 200, b: 255 });
    }

    fn compose_name_edit(&mut self, app: &App) {
        let caret = if (app.anim_tick / 8) % 2 == 0 { "_" } else { " " };
        self.modal_box(&[
            ("Enter your name".to_string(), GOLD),
            (String::new(), Color::White),
            (format!("> {}{}", app.name_draft, caret), GREEN),
            (String::new(), Color::White),
            ("▸ ENTER: Save   ESC: Cancel".to_string(), Color::DarkGrey),
        ], GOLD);
        self.compose_message(app, self.front.height.saturating_sub(1));
    }
}

/// Unrevealed tile color per world; the bonus round has its own.
fn world_accent(world: World, bonus: bool) -> Color {
    if bonus {
        return Color::Rgb { r: 150, g: 100, b: 0 };
    }
    match world {
        World::Grid3 => Color::Rgb { r: 40, g: 90, b: 60 },
        World::Grid4 => Color::Rgb { r: 40, g: 60, b: 110 },
        World::Grid5 => Color::Rgb { r: 90, g: 40, b: 100 },
    }
}

fn hit_test(rects: &[TileRect], col: usize, row: usize) -> Option<usize> {
    rects
        .iter()
        .find(|r| col >= r.x && col < r.x + TILE_W && row >= r.y && row < r.y + TILE_H)
        .map(|r| r.index)
}

struct LeaderboardLines {
    top: Vec<String>,
    player: String,
}

fn leaderboard_lines(app: &App) -> LeaderboardLines {
    let top: Vec<String> = if app.leaderboard.is_empty() {
        vec!["No entry yet.".to_string()]
    } else {
        app.leaderboard
            .top()
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{:>3}. {} - {}XP", i + 1, e.player, e.best_score))
            .collect()
    };
    let player = match app.leaderboard.rank_of(&app.player_name) {
        Some((rank, e)) => format!("{:>3}. {} - {}XP", rank, e.player, e.best_score),
        None => format!("{UNRANKED}. {} - 0XP", app.player_name),
    };
    LeaderboardLines { top, player }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::sim::leaderboard::Leaderboard;
    use crate::sim::session::Session;

    fn app_with(board: Leaderboard, name: &str) -> App {
        App::new(Session::with_seed(1, Duration::from_secs(1)), board, name.into(), 4)
    }

    #[test]
    fn hit_test_maps_cells_to_tiles() {
        let rects = vec![
            TileRect { x: 4, y: 3, index: 0 },
            TileRect { x: 4 + TILE_W + TILE_GAP, y: 3, index: 1 },
        ];
        assert_eq!(hit_test(&rects, 4, 3), Some(0));
        assert_eq!(hit_test(&rects, 4 + TILE_W - 1, 3 + TILE_H - 1), Some(0));
        assert_eq!(hit_test(&rects, 4 + TILE_W, 3), None); // gap
        assert_eq!(hit_test(&rects, 4 + TILE_W + TILE_GAP, 4), Some(1));
        assert_eq!(hit_test(&rects, 0, 0), None);
    }

    #[test]
    fn empty_board_shows_placeholder_and_unranked_player() {
        let lines = leaderboard_lines(&app_with(Leaderboard::in_memory(), "Bob"));
        assert_eq!(lines.top, vec!["No entry yet.".to_string()]);
        assert_eq!(lines.player, "999. Bob - 0XP");
    }

    #[test]
    fn ranked_player_line_shows_rank() {
        let mut board = Leaderboard::in_memory();
        board.record("Alice", 900);
        board.record("Bob", 450);
        let lines = leaderboard_lines(&app_with(board, "Bob"));
        assert_eq!(lines.top.len(), 2);
        assert_eq!(lines.top[0], "  1. Alice - 900XP");
        assert_eq!(lines.player, "  2. Bob - 450XP");
    }

    #[test]
    fn cell_text_is_utf8_safe() {
        let cell = Cell::from_char('💰', Color::Reset, Color::Reset);
        assert_eq!(cell.as_str(), "💰");
        assert_eq!(Cell::WIDE_CONT.as_str(), "");
    }
}
