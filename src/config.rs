//! Game settings
//!
//! Loaded once at startup from an optional JSON file. Every field falls
//! back to the constant in `crate::consts`, so a partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Acceleration change per second while forward/back is held
    pub accelerate_rate: f64,
    /// Angular velocity while a turn key is held (rad/s)
    pub turn_rate: f64,
    /// Speed cap passed to the car each frame
    pub max_speed: f64,
    /// Probability of a spawn on an eligible frame
    pub spawn_chance: f64,
    /// Seconds that must pass between spawns
    pub min_spawn_interval: f64,
    pub border_offset: f64,
    pub top_border_ratio: f64,
    /// Text sprite for the car
    pub sprite_path: PathBuf,
    /// Target frame interval in milliseconds
    pub frame_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accelerate_rate: ACCELERATE_RATE,
            turn_rate: TURN_RATE,
            max_speed: MAX_SPEED,
            spawn_chance: SPAWN_CHANCE,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            border_offset: BORDER_OFFSET,
            top_border_ratio: TOP_BORDER_RATIO,
            sprite_path: PathBuf::from("assets/car.txt"),
            frame_ms: 33,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, GameError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|err| match err {
            GameError::Config { message, .. } => GameError::Config {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), GameError> {
        let reject = |message: &str| {
            Err(GameError::Config {
                path: None,
                message: message.to_string(),
            })
        };
        if !(self.accelerate_rate > 0.0) {
            return reject("accelerate_rate must be positive");
        }
        if !(self.turn_rate > 0.0) {
            return reject("turn_rate must be positive");
        }
        if !(self.max_speed > 0.0) {
            return reject("max_speed must be positive");
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return reject("spawn_chance must lie in [0, 1]");
        }
        if !(self.min_spawn_interval >= 0.0) {
            return reject("min_spawn_interval must not be negative");
        }
        if !(self.border_offset >= 0.0) {
            return reject("border_offset must not be negative");
        }
        if !(0.0..=1.0).contains(&self.top_border_ratio) {
            return reject("top_border_ratio must lie in [0, 1]");
        }
        if self.frame_ms == 0 {
            return reject("frame_ms must be at least 1");
        }
        Ok(())
    }
}
