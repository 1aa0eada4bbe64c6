/// Game entity types and their per-entity physics.

use std::collections::HashSet;

use crate::asset::CarSprite;
use crate::border::Borders;
use crate::config::Settings;
use crate::consts::*;
use crate::normalize_angle;

// ── Car ───────────────────────────────────────────────────────────────────────

/// The player's car.
///
/// `velocity` is signed and measured along `angle`. The default heading of
/// π/2 points down the screen, so driving "forward" means negative velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub acceleration: f64,
    /// Heading in radians, kept in [0, 2π).
    pub angle: f64,
    pub angle_velocity: f64,
    pub sprite: CarSprite,
}

impl Car {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            acceleration: 0.0,
            angle: std::f64::consts::FRAC_PI_2,
            angle_velocity: 0.0,
            sprite: CarSprite::NotLoaded,
        }
    }

    /// Advance one frame.
    ///
    /// Order matters: acceleration clamp, velocity, heading, then position
    /// from the updated heading and velocity.
    pub fn update(&mut self, delta_time: f64, max_speed: f64) {
        self.acceleration = self.acceleration.clamp(-MAX_ACCELERATION, MAX_ACCELERATION);

        self.velocity += self.acceleration * delta_time;
        if self.velocity > max_speed {
            self.velocity = max_speed;
        } else if self.velocity < -max_speed {
            self.velocity = -max_speed;
        }

        self.angle = normalize_angle(self.angle + self.angle_velocity * delta_time);

        self.x += self.velocity * self.angle.cos() * delta_time;
        self.y += self.velocity * self.angle.sin() * delta_time;
    }

    /// Width of the loaded sprite, 0 when there is none.
    pub fn image_width(&self) -> f64 {
        self.sprite.size().0
    }

    /// Height of the loaded sprite, 0 when there is none.
    pub fn image_height(&self) -> f64 {
        self.sprite.size().1
    }

    /// Footprint used for bounds and collisions, falling back to the default.
    pub fn footprint(&self) -> (f64, f64) {
        let or_default = |v: f64| if v > 0.0 { v } else { DEFAULT_FOOTPRINT };
        (or_default(self.image_width()), or_default(self.image_height()))
    }

    /// Vertical component of the car's motion.
    pub fn vertical_velocity(&self) -> f64 {
        self.velocity * self.angle.sin()
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Centre position.
    pub x: f64,
    pub y: f64,
    /// Vertical velocity, rewritten by the game every frame.
    pub velocity: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, velocity: f64) -> Self {
        Self {
            x,
            y,
            velocity,
            width: OBSTACLE_SIZE,
            height: OBSTACLE_SIZE,
        }
    }

    pub fn update(&mut self, delta_time: f64) {
        self.y += self.velocity * delta_time;
    }

    /// Fully below the viewport with one obstacle height of margin.
    pub fn is_off_screen(&self, canvas_height: f64) -> bool {
        self.y > canvas_height + self.height
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKey {
    Forward,
    Back,
    TurnLeft,
    TurnRight,
}

/// Snapshot of the keys held during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys(HashSet<InputKey>);

impl HeldKeys {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: InputKey) -> bool {
        self.0.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<InputKey> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = InputKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so the update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub car: Car,
    pub obstacles: Vec<Obstacle>,
    pub borders: Borders,
    /// Obstacles passed minus obstacles hit, never below zero.
    pub score: u32,
    /// Seconds of simulated time since the session started.
    pub elapsed: f64,
    /// Session time of the most recent spawn. Starts one interval before
    /// the session so the first frame may already spawn.
    pub last_spawn_time: f64,
    pub frame: u64,
    /// Viewport size in world units.
    pub width: f64,
    pub height: f64,
    pub settings: Settings,
}
