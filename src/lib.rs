//! Road Racer - a top-down terminal driving game
//!
//! Core modules:
//! - `entities`: Car, obstacles, held input and the master game state
//! - `border`: boundary segments and crossing detection
//! - `compute`: per-frame simulation steps
//! - `display` / `surface`: rendering against an abstract drawing surface
//! - `input`, `scheduler`: terminal input tracking and the frame loop

pub mod asset;
pub mod border;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod input;
pub mod scheduler;
pub mod surface;

pub use config::Settings;
pub use error::GameError;

/// Game tuning constants
pub mod consts {
    /// Hard cap on |acceleration| (units/s²)
    pub const MAX_ACCELERATION: f64 = 200.0;
    /// Speed cap applied by the frame loop
    pub const MAX_SPEED: f64 = 450.0;

    /// Acceleration change per second while forward/back is held
    pub const ACCELERATE_RATE: f64 = 75.0;
    /// Angular velocity while a turn key is held (rad/s)
    pub const TURN_RATE: f64 = 2.0;

    /// Distance of the side borders from the viewport edges
    pub const BORDER_OFFSET: f64 = 50.0;
    /// Top border position as a fraction of viewport height
    pub const TOP_BORDER_RATIO: f64 = 0.5;

    /// Obstacle spawn
    pub const SPAWN_CHANCE: f64 = 0.2;
    pub const MIN_SPAWN_INTERVAL: f64 = 0.5;
    pub const SPAWN_Y: f64 = -50.0;
    /// Fraction of viewport width covered by the road
    pub const ROAD_BAND: f64 = 0.6;

    pub const OBSTACLE_SIZE: f64 = 40.0;
    /// Footprint used when no car sprite is available
    pub const DEFAULT_FOOTPRINT: f64 = 40.0;

    /// Car start position as a fraction of viewport height
    pub const CAR_START_RATIO: f64 = 0.85;

    /// World units covered by one terminal cell
    pub const CELL_WIDTH: f64 = 10.0;
    pub const CELL_HEIGHT: f64 = 20.0;

    /// Centre line dash pattern (on, off)
    pub const CENTER_DASH: (f64, f64) = (30.0, 30.0);
    /// Score text inset from the top-right corner
    pub const SCORE_PADDING: f64 = 20.0;
}

/// Normalize an angle into [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::TAU;
    let wrapped = angle % TAU;
    if wrapped < 0.0 {
        // -1e-17 + TAU rounds to TAU
        let lifted = wrapped + TAU;
        if lifted >= TAU {
            0.0
        } else {
            lifted
        }
    } else {
        wrapped
    }
}
