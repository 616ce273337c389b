mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_shooter::compute::{jump_to_wave, new_game, tick, toggle_god_mode, InputIntents};
use space_shooter::config::{GameConfig, TICK_RATE};
use space_shooter::entities::GameState;
use space_shooter::snapshot::snapshot;

const FRAME: Duration = Duration::from_micros(1_000_000 / TICK_RATE as u64);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// OS key-repeat runs at ≥ 15 Hz, so 8 frames (≈133 ms) is always refreshed
/// before it expires.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser, Debug)]
#[command(name = "space_shooter", about = "Terminal arcade shooter")]
struct Args {
    /// Seed for a reproducible session (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Wave to begin at
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    start_wave: Option<u32>,

    /// Log file (the terminal itself is taken by the game)
    #[arg(long, default_value = "space_shooter.log")]
    log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Start with an infinite shield
    #[arg(long)]
    god_mode: bool,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Digit keys jump straight to a wave; `0` stands for wave 10.
fn digit_wave(c: char) -> Option<u32> {
    match c.to_digit(10)? {
        0 => Some(10),
        n => Some(n),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every key, and each frame the keys that are still fresh become
/// held intents.  One-shot actions (pause, menu, restart, god mode, wave
/// jumps) fire on the press event itself.
///
/// Terminals with keyboard enhancement (kitty protocol) report real
/// `Release` events and keys are dropped immediately; elsewhere they expire
/// after `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut intents = InputIntents::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(' ') | KeyCode::Enter => intents.start = true,
                        KeyCode::Char('p') | KeyCode::Char('P') => intents.pause_toggle = true,
                        KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => {
                            intents.menu = true
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => intents.restart = true,
                        KeyCode::Char('g') | KeyCode::Char('G') => intents.god_mode_toggle = true,
                        KeyCode::Char(c) if c.is_ascii_digit() => {
                            intents.jump_to_wave = digit_wave(c)
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Held keys ─────────────────────────────────────────────────────────
        intents.move_left = any_held(
            &key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        );
        intents.move_right = any_held(
            &key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        );
        intents.fire = is_held(&key_frame, &KeyCode::Char(' '), frame);

        *state = tick(state, &intents, rng);
        display::render(out, &snapshot(state))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    simple_logging::log_to_file(&args.log_file, args.log_level)
        .with_context(|| format!("cannot open log file {}", args.log_file.display()))?;

    let config = GameConfig::default();
    config.validate().context("invalid game configuration")?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut state = new_game(config, &mut rng);
    if let Some(wave) = args.start_wave {
        jump_to_wave(&mut state, wave, &mut rng);
    }
    if args.god_mode {
        toggle_god_mode(&mut state);
    }
    info!("session starting (seed: {:?})", args.seed);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for release/repeat events; terminals without support ignore it.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen on their own thread so the loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut state, &rx, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("session ended at wave {} with score {}", state.wave, state.score);
    result.context("terminal I/O failed")
}
