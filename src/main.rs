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
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use space_debris::input::{InputSnapshot, Key};
use space_debris::{logging, FrameOutcome, GameConfig, GameController};

use display::TerminalSink;

/// Defend the world from falling space debris
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file overriding the default game settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for debris spawns; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Frame rate cap, overrides the config file
    #[arg(long)]
    fps: Option<u32>,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// much time. Covers terminals that don't emit key-release events: the OS
/// key-repeat rate is ≥ 15 Hz, so the window is refreshed before expiry.
const HOLD_TIME: Duration = Duration::from_millis(133);

fn hold_window(fps: u32) -> u64 {
    ((HOLD_TIME.as_secs_f64() * fps as f64).round() as u64).max(1)
}

fn map_key(code: &KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Key::Restart),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Key::Escape),
        _ => None,
    }
}

/// Keys seen within the last `window` frames.
fn snapshot(key_frame: &HashMap<KeyCode, u64>, frame: u64, window: u64) -> InputSnapshot {
    key_frame
        .iter()
        .filter(|&(_, &last)| frame.saturating_sub(last) <= window)
        .filter_map(|(code, _)| map_key(code))
        .collect()
}

// ── Frame clock ───────────────────────────────────────────────────────────────

struct FrameClock {
    period: Duration,
    started: Instant,
}

impl FrameClock {
    fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            started: Instant::now(),
        }
    }

    fn start(&mut self) {
        self.started = Instant::now();
    }

    /// Sleep off whatever is left of this frame.
    fn wait(&self) {
        let elapsed = self.started.elapsed();
        if elapsed < self.period {
            thread::sleep(self.period - elapsed);
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every key, and each frame's snapshot holds the keys that are
/// still fresh. Keyboard-enhancement terminals also send `Release`, which
/// drops the key immediately.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut GameController,
    rng: &mut impl Rng,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let window = hold_window(game.config().fps);
    let mut clock = FrameClock::new(game.config().fps);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    let (mut term_width, mut term_height) = terminal::size()?;
    let mut sink = TerminalSink::new(
        term_width,
        term_height,
        game.config().width,
        game.config().height,
    );

    loop {
        clock.start();
        frame += 1;

        let mut interrupted = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                            interrupted = true;
                        }
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Resize(width, height) => {
                    term_width = width;
                    term_height = height;
                    sink = TerminalSink::new(
                        term_width,
                        term_height,
                        game.config().width,
                        game.config().height,
                    );
                }
                _ => {}
            }
        }

        let mut input = snapshot(&key_frame, frame, window);
        if interrupted {
            input.press(Key::Escape);
        }

        if game.step(&input, rng)? == FrameOutcome::Exit {
            return Ok(());
        }

        sink.clear();
        game.draw(&mut sink);
        display::render(out, &sink, game)?;

        clock.wait();
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_file.as_deref()).context("failed to open log file")?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    config.validate()?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    log::info!("starting with {:?}, seed {:?}", config, args.seed);
    let mut game = GameController::new(config, &mut rng)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut game, &mut rng, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!("exiting after {} rounds", game.round());
    result
}
