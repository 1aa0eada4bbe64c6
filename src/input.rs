/// Terminal input: key events in, held-key snapshots out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::{HeldKeys, InputKey};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
pub const HOLD_WINDOW: u64 = 4;

/// How often the listener thread checks whether it should stop.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Map a terminal key to the game's key vocabulary.
pub fn game_key(code: &KeyCode) -> Option<InputKey> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(InputKey::Forward),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(InputKey::Back),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(InputKey::TurnLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(InputKey::TurnRight),
        _ => None,
    }
}

/// True for the keys that end the session.
pub fn is_quit(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Tracks the frame each game key was last seen on.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper
///   `Press` / `Repeat` / `Release` events, keys drop on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`). Keys expire after `HOLD_WINDOW` frames of silence.
#[derive(Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<InputKey, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &KeyEvent, frame: u64) {
        let Some(key) = game_key(&event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(key, frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&key);
            }
        }
    }

    /// Keys held as of `frame`.
    pub fn held(&self, frame: u64) -> HeldKeys {
        self.last_seen
            .iter()
            .filter(|(_, &last)| frame.saturating_sub(last) <= HOLD_WINDOW)
            .map(|(&key, _)| key)
            .collect()
    }
}

/// Background thread reading terminal events into a channel.
///
/// Dropping the listener stops and joins the thread, so the reader that was
/// started is always the one torn down.
pub struct InputListener {
    rx: Receiver<Event>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputListener {
    pub fn start() -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(err) => {
                        log::error!("input poll failed: {err}");
                        break;
                    }
                }
                match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break; // receiver dropped
                        }
                    }
                    Err(err) => {
                        log::error!("input read failed: {err}");
                        break;
                    }
                }
            }
        });
        Self {
            rx,
            stop,
            handle: Some(handle),
        }
    }

    /// All events received since the last call, without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

impl Drop for InputListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("input thread panicked");
            }
        }
    }
}
