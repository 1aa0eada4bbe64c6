//! Car sprite loading.
//!
//! Sprites are plain text files, one terminal row per line. Loading happens
//! on a background thread; the frame loop polls for the result.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::consts::{CELL_HEIGHT, CELL_WIDTH};
use crate::error::GameError;

/// A loaded text sprite and its footprint in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub rows: Vec<String>,
    pub width: f64,
    pub height: f64,
}

impl Sprite {
    /// Build a sprite from its text rows. Trailing blank lines are dropped.
    pub fn from_text(text: &str) -> Option<Self> {
        let mut rows: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return None;
        }
        Some(Self {
            width: cols as f64 * CELL_WIDTH,
            height: rows.len() as f64 * CELL_HEIGHT,
            rows,
        })
    }
}

/// Load state of the car's visual.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CarSprite {
    #[default]
    NotLoaded,
    Loaded(Arc<Sprite>),
    Failed,
}

impl CarSprite {
    /// Footprint of the loaded sprite, `(0, 0)` otherwise.
    pub fn size(&self) -> (f64, f64) {
        match self {
            CarSprite::Loaded(sprite) => (sprite.width, sprite.height),
            CarSprite::NotLoaded | CarSprite::Failed => (0.0, 0.0),
        }
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        match self {
            CarSprite::Loaded(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Fold a finished load into a sprite state, logging the outcome.
    pub fn from_load(path: &Path, result: Result<Sprite, GameError>) -> Self {
        match result {
            Ok(sprite) => {
                log::info!(
                    "car sprite loaded from {} ({}x{})",
                    path.display(),
                    sprite.width,
                    sprite.height
                );
                CarSprite::Loaded(Arc::new(sprite))
            }
            Err(err) => {
                log::error!("failed to load car sprite from {}: {err}", path.display());
                CarSprite::Failed
            }
        }
    }
}

/// Read a sprite file synchronously.
pub fn load_sprite(path: &Path) -> Result<Sprite, GameError> {
    let text = std::fs::read_to_string(path)?;
    Sprite::from_text(&text).ok_or_else(|| GameError::EmptySprite {
        path: path.to_path_buf(),
    })
}

/// A sprite load running on its own thread.
pub struct SpriteLoader {
    path: PathBuf,
    rx: Option<Receiver<Result<Sprite, GameError>>>,
}

impl SpriteLoader {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let thread_path = path.clone();
        log::info!("loading car sprite from {}", path.display());
        thread::spawn(move || {
            // Receiver gone means the session already ended.
            let _ = tx.send(load_sprite(&thread_path));
        });
        Self { path, rx: Some(rx) }
    }

    /// Non-blocking check. Yields the finished state exactly once.
    pub fn poll(&mut self) -> Option<CarSprite> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(GameError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "loader thread exited without a result",
            ))),
        };
        self.rx = None;
        Some(CarSprite::from_load(&self.path, result))
    }
}
