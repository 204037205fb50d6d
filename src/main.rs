/// Entry point and game loop.

mod app;
mod config;
mod domain;
mod sim;
mod ui;

use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use app::{Action, App, Overlay};
use config::GameConfig;
use sim::event::GameEvent;
use sim::leaderboard::{self, Leaderboard};
use sim::session::{Phase, Session};
use sim::step;
use ui::gamepad::{Dir, GamepadState};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{Sfx, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    init_logging(&config.log_file);
    if let Some(w) = &config.load_warning {
        log::warn!("{w}");
    }

    let board = Leaderboard::load(leaderboard::resolve_path(&config.leaderboard_file));
    let mut session = Session::new(config.timing.second());
    let player_name = config
        .player_name
        .clone()
        .unwrap_or_else(|| app::random_player_name(&mut session.rng));
    log::info!("player: {player_name}");
    let mut app = App::new(session, board, player_name, config.timing.flash_frames);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound_enabled { SoundEngine::new() } else { None };

    let result = game_loop(&mut app, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Find the Treasure, {}!", app.player_name);
    if let Some(best) = app.leaderboard.best_score(&app.player_name) {
        println!("Best score: {best} XP");
    }
}

/// Log to a file: stdout/stderr belong to the alternate screen.
fn init_logging(log_file: &Path) {
    let path = leaderboard::resolve_path(log_file);
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            // No writable log file: stay silent rather than draw over the game
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    if builder.try_init().is_ok() {
        log::info!("logging to {}", path.display());
    }
}

fn game_loop(
    app: &mut App,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let frame_rate = config.timing.frame();
    let mut last_frame = Instant::now();
    let mut last_clock = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || quit_requested(app, &kb) {
            break;
        }

        for action in collect_actions(app, renderer, &kb, &gp) {
            let events = app.handle(action);
            process_sound_events(sound, &events);
        }

        // Countdown: whole seconds due since the last pass
        let now = Instant::now();
        let due = app.session.timer.advance(now - last_clock);
        last_clock = now;
        for _ in 0..due {
            let events = step::tick_second(&mut app.session);
            app.absorb(&events);
            process_sound_events(sound, &events);
        }

        if last_frame.elapsed() >= frame_rate {
            app.frame_tick();
            last_frame = Instant::now();
        }

        renderer.render(app)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        let effect = match event {
            GameEvent::TreasureFound { .. } | GameEvent::BonusTreasure { .. } => Sfx::Coin,
            GameEvent::ExtraLifeFound { .. } | GameEvent::ExtraScoreFound { .. } => Sfx::OneUp,
            GameEvent::Missed { .. } | GameEvent::BonusMiss { .. } => Sfx::Wrong,
            GameEvent::TimerTick { remaining: 1..=3 } => Sfx::Tick,
            GameEvent::RoundSucceeded { .. } => Sfx::RoundClear,
            GameEvent::RoundFailed { .. } => Sfx::LifeLost,
            GameEvent::GameOver { .. } => Sfx::GameOver,
            GameEvent::BonusStarted { .. } => Sfx::BonusStart,
            _ => continue,
        };
        sfx.play(effect);
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_PICK: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_BACK: &[KeyCode] = &[KeyCode::Esc];
const KEYS_LEADERBOARD: &[KeyCode] = &[KeyCode::Char('l'), KeyCode::Char('L')];
const KEYS_INSTRUCTIONS: &[KeyCode] = &[KeyCode::Char('i'), KeyCode::Char('I')];
const KEYS_NAME: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Q quits from the bare menu only.
fn quit_requested(app: &App, kb: &InputState) -> bool {
    app.session.phase == Phase::Menu
        && app.overlay == Overlay::None
        && kb.any_pressed(KEYS_QUIT)
}

/// Translate this frame's keyboard, mouse and pad input into actions.
fn collect_actions(app: &App, renderer: &Renderer, kb: &InputState, gp: &GamepadState) -> Vec<Action> {
    let mut actions = Vec::new();

    // Name editor swallows printable keys
    if app.overlay == Overlay::NameEdit {
        actions.extend(kb.typed_chars().map(Action::Type));
        actions.extend(std::iter::repeat(Action::Erase).take(kb.backspaces()));
        if kb.any_pressed(KEYS_CONFIRM) {
            actions.push(Action::Confirm);
        }
        if kb.any_pressed(KEYS_BACK) || gp.cancel_pressed() {
            actions.push(Action::Back);
        }
        return actions;
    }

    for (keys, dir) in [(KEYS_UP, Dir::Up), (KEYS_DOWN, Dir::Down), (KEYS_LEFT, Dir::Left), (KEYS_RIGHT, Dir::Right)] {
        if kb.any_pressed(keys) {
            actions.push(Action::Move(dir));
        }
    }
    actions.extend(gp.moves().iter().map(|&d| Action::Move(d)));

    // Number keys address the 3×3 grid directly
    if app.session.tiles.side() == 3 {
        if let Some(index) = kb.digit_pressed() {
            actions.push(Action::Select(index));
        }
    }
    for &(col, row) in &kb.clicks {
        if let Some(index) = renderer.tile_at(col, row) {
            actions.push(Action::Select(index));
        }
    }

    if kb.any_pressed(KEYS_PICK) || gp.select_pressed() {
        actions.push(Action::SelectCursor);
    }
    if kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed() {
        actions.push(Action::Confirm);
    }
    if kb.any_pressed(KEYS_BACK) || gp.cancel_pressed() {
        actions.push(Action::Back);
    }
    if kb.any_pressed(KEYS_LEADERBOARD) || gp.leaderboard_pressed() {
        actions.push(Action::ToggleLeaderboard);
    }
    if kb.any_pressed(KEYS_INSTRUCTIONS) {
        actions.push(Action::ToggleInstructions);
    }
    if kb.any_pressed(KEYS_NAME) {
        actions.push(Action::EditName);
    }
    actions
}
