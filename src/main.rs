use std::io::{self, stdout, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use road_racer::asset::SpriteLoader;
use road_racer::compute::{init_state, resize, update};
use road_racer::consts::{CELL_HEIGHT, CELL_WIDTH};
use road_racer::display::{self, TerminalSurface};
use road_racer::input::{is_quit, InputListener, KeyTracker};
use road_racer::scheduler::{run_frames, CancelToken, SystemClock};
use road_racer::{GameError, Settings};

/// Viewport in world units for a terminal of `cols` x `rows`.
fn viewport(cols: u16, rows: u16) -> (f64, f64) {
    (cols as f64 * CELL_WIDTH, rows as f64 * CELL_HEIGHT)
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode for the whole session, so logs go to a file.
fn init_logging() {
    let path = std::env::temp_dir().join("road_racer.log");
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match std::fs::File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

// ── Terminal setup ────────────────────────────────────────────────────────────

/// Raw mode + alternate screen for as long as the guard lives.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self {
            keyboard_enhanced: false,
        };
        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;

        // Request key-release (and key-repeat) events from the terminal.
        // Kitty-protocol terminals support this; others fall back gracefully.
        guard.keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    init_logging();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;

    let _terminal = TerminalGuard::enter()?;
    let result = run(settings);
    if let Err(err) = &result {
        log::error!("session ended with error: {err}");
    }
    result
}

fn run(settings: Settings) -> Result<(), GameError> {
    let (cols, rows) = terminal::size()?;
    let (width, height) = viewport(cols, rows);
    let interval = Duration::from_millis(settings.frame_ms);

    let mut surface = TerminalSurface::new(BufWriter::new(stdout()), cols, rows);
    let mut loader = SpriteLoader::spawn(settings.sprite_path.clone());
    let mut state = init_state(width, height, settings);

    let listener = InputListener::start();
    let mut tracker = KeyTracker::new();
    let mut rng = thread_rng();
    let token = CancelToken::new();
    let clock = SystemClock::new();

    log::info!("session started on a {cols}x{rows} terminal ({width}x{height} units)");

    let frames = run_frames(&clock, &token, interval, |delta_time| {
        let frame = state.frame + 1;

        // ── Drain pending terminal events (non-blocking) ──────────────────────
        for event in listener.drain() {
            match event {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Release && is_quit(&key.code, key.modifiers) {
                        token.cancel();
                    }
                    tracker.record(&key, frame);
                }
                Event::Resize(cols, rows) => {
                    let (width, height) = viewport(cols, rows);
                    match resize(&state, width, height) {
                        Ok(next) => {
                            state = next;
                            surface.resize(cols, rows);
                        }
                        Err(err) => log::warn!("ignoring resize: {err}"),
                    }
                }
                _ => {}
            }
        }
        if token.is_cancelled() {
            return Ok::<(), GameError>(());
        }

        if let Some(sprite) = loader.poll() {
            state.car.sprite = sprite;
        }

        let keys = tracker.held(frame);
        state = update(&state, &keys, delta_time, &mut rng);
        display::render(&mut surface, &state)?;
        Ok(())
    })?;

    log::info!("session over after {frames} frames, score {}", state.score);
    Ok(())
}
