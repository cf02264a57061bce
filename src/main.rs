mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use blade_gauntlet::compute::{init_session, update};
use blade_gauntlet::config::{self, Tuning, TICK_DT};
use blade_gauntlet::entities::{GameSession, Variant};
use blade_gauntlet::error::SinkError;
use blade_gauntlet::events::SoundCue;
use blade_gauntlet::input::InputSnapshot;
use blade_gauntlet::sinks::{dispatch_audio, draw, AudioSink};

use display::TerminalRenderer;

const FRAME: Duration = Duration::from_micros(16_667); // ≈60 FPS

/// A key counts as held if its last press/repeat event arrived within this
/// many frames (≈133 ms).
///
/// Terminals without key-release events only report OS key-repeats, and the
/// first repeat comes after the OS repeat delay (usually 250-500 ms). A key
/// held past the window therefore reads as released and then pressed again
/// when repeats begin, so a held attack key can start a second swing there.
/// Keyboard-enhancement terminals report the release and are not affected.
const HOLD_WINDOW: u64 = 8;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "blade_gauntlet")]
#[command(about = "Sword-fighting platformer for the terminal")]
struct Cli {
    /// Which game to play
    #[arg(long, value_enum, default_value_t = VariantArg::Waves)]
    variant: VariantArg,
    /// RON file overriding simulation tunables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Enemy waves, a locked exit and a boss
    Waves,
    /// One platform level with a goal ledge
    Open,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Waves => Variant::Waves,
            VariantArg::Open => Variant::Open,
        }
    }
}

/// The terminal owns stdout and stderr, so logs only go to a file.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_tuning(path: Option<&Path>) -> std::io::Result<Tuning> {
    match path {
        None => Ok(Tuning::default()),
        Some(path) => config::load(path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e)),
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// No audio device in a terminal; cues are written to the log.
struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), SinkError> {
        log::info!("sound: {}", cue.name());
        Ok(())
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Fold held keys and this frame's presses into the snapshot the core reads.
/// A press released within the same frame still shows up as down once.
fn snapshot(key_frame: &HashMap<KeyCode, u64>, pressed: &[KeyCode], frame: u64) -> InputSnapshot {
    let down = |keys: &[KeyCode]| {
        keys.iter()
            .any(|k| pressed.contains(k) || is_held(key_frame, k, frame))
    };
    InputSnapshot {
        left: down(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
        right: down(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
        jump: down(&[KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
        attack: down(&[KeyCode::Char('x'), KeyCode::Char('X')]),
        confirm: down(&[KeyCode::Enter]),
        escape: down(&[KeyCode::Esc]),
        toggle_sound: down(&[KeyCode::Char('m'), KeyCode::Char('M')]),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: `key_frame` records the frame of the last press/repeat event
/// for every key, and each frame the live keys become one `InputSnapshot`.
/// On keyboard-enhancement terminals (Ghostty, kitty) keys leave the map on
/// release; elsewhere they expire after `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(
    renderer: &mut TerminalRenderer<W>,
    session: &mut GameSession,
    rx: &mpsc::Receiver<Event>,
) {
    let mut rng = thread_rng();
    let mut audio = LogAudio;
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain pending input (non-blocking) ────────────────────────────────
        let mut pressed: Vec<KeyCode> = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return,
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return,
                        _ => {}
                    }
                    key_frame.insert(code.clone(), frame);
                    pressed.push(code);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Simulate, then hand off to the collaborators ──────────────────────
        let input = snapshot(&key_frame, &pressed, frame);
        let (next, events) = update(session, &input, TICK_DT, &mut rng);
        *session = next;
        dispatch_audio(&events, &mut audio, session.sound_enabled);
        draw(session, renderer);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    let tuning = load_tuning(cli.config.as_deref())?;
    let mut session = init_session(cli.variant.into(), tuning);
    log::info!("starting {:?}", session.variant);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    {
        let mut renderer = TerminalRenderer::new(&mut out);
        game_loop(&mut renderer, &mut session, &rx);
    }
    log::info!("quit after {} frames", session.frame);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    Ok(())
}
