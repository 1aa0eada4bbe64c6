use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors surfaced outside the per-frame simulation.
///
/// The simulation itself is total; only loading, configuration and
/// terminal I/O can fail.
#[derive(Debug)]
pub enum GameError {
    Io(io::Error),
    EmptySprite { path: PathBuf },
    Config { path: Option<PathBuf>, message: String },
    InvalidViewport { width: f64, height: f64 },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::EmptySprite { path } => {
                write!(f, "sprite file {} has no rows", path.display())
            }
            Self::Config { path: Some(path), message } => {
                write!(f, "bad settings in {}: {message}", path.display())
            }
            Self::Config { path: None, message } => write!(f, "bad settings: {message}"),
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport {width}x{height} has no area")
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for GameError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            path: None,
            message: err.to_string(),
        }
    }
}
