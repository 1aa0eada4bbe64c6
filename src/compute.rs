/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus held keys, frame time and, where needed, an RNG handle)
/// and returns a brand-new `GameState`. Side effects are limited to the
/// injected RNG.

use rand::Rng;

use crate::border::Borders;
use crate::config::Settings;
use crate::consts::*;
use crate::entities::{Car, GameState, HeldKeys, InputKey, Obstacle};
use crate::error::GameError;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state for a viewport of `width` x `height` units.
pub fn init_state(width: f64, height: f64, settings: Settings) -> GameState {
    GameState {
        car: Car::new(width / 2.0, height * CAR_START_RATIO),
        obstacles: Vec::new(),
        borders: Borders::new(
            width,
            height,
            settings.border_offset,
            settings.top_border_ratio,
        ),
        score: 0,
        elapsed: 0.0,
        // Eligible to spawn from the first frame
        last_spawn_time: -settings.min_spawn_interval,
        frame: 0,
        width,
        height,
        settings,
    }
}

/// Re-home borders and car for a new viewport size.
///
/// The car keeps its offset from the viewport centre as a fraction of the
/// viewport size. Obstacles are left where they are.
pub fn resize(state: &GameState, width: f64, height: f64) -> Result<GameState, GameError> {
    if !(width > 0.0 && height > 0.0) {
        return Err(GameError::InvalidViewport { width, height });
    }

    // No previous area to scale from: start the car over at its home spot
    let (x, y) = if state.width > 0.0 && state.height > 0.0 {
        let ratio_x = (state.car.x - state.width / 2.0) / state.width;
        let ratio_y = (state.car.y - state.height / 2.0) / state.height;
        (width / 2.0 + ratio_x * width, height / 2.0 + ratio_y * height)
    } else {
        (width / 2.0, height * CAR_START_RATIO)
    };
    let car = Car {
        x,
        y,
        ..state.car.clone()
    };

    let mut borders = state.borders;
    borders.reposition(
        width,
        height,
        state.settings.border_offset,
        state.settings.top_border_ratio,
    );

    log::info!(
        "viewport resized from {}x{} to {}x{}",
        state.width,
        state.height,
        width,
        height
    );

    Ok(GameState {
        car,
        borders,
        width,
        height,
        ..state.clone()
    })
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Apply the held keys to the car's controls.
///
/// Forward/back accumulate onto acceleration every frame they are held.
/// Turning sets the angular velocity outright; left wins when both are held.
pub fn handle_input(state: &GameState, keys: &HeldKeys, delta_time: f64) -> GameState {
    let rate = state.settings.accelerate_rate;
    let turn = state.settings.turn_rate;
    let mut car = state.car.clone();

    if keys.contains(InputKey::Forward) {
        car.acceleration -= rate * delta_time;
    }
    if keys.contains(InputKey::Back) {
        car.acceleration += rate * delta_time;
    }

    if keys.contains(InputKey::TurnRight) {
        car.angle_velocity = turn;
    }
    if keys.contains(InputKey::TurnLeft) {
        car.angle_velocity = -turn;
    }
    if !keys.contains(InputKey::TurnLeft) && !keys.contains(InputKey::TurnRight) {
        car.angle_velocity = 0.0;
    }

    GameState {
        car,
        ..state.clone()
    }
}

// ── Car motion ───────────────────────────────────────────────────────────────

pub fn integrate_car(state: &GameState, delta_time: f64) -> GameState {
    let mut car = state.car.clone();
    car.update(delta_time, state.settings.max_speed);
    GameState {
        car,
        ..state.clone()
    }
}

/// Keep the car's footprint inside the viewport.
///
/// Hitting a side wall also stops the car; top and bottom only snap.
pub fn keep_car_in_bounds(state: &GameState) -> GameState {
    let mut car = state.car.clone();
    let (car_width, car_height) = car.footprint();
    let half_width = car_width / 2.0;
    let half_height = car_height / 2.0;

    if car.x - half_width < 0.0 {
        car.x = half_width;
        car.velocity = 0.0;
    } else if car.x + half_width > state.width {
        car.x = state.width - half_width;
        car.velocity = 0.0;
    }

    if car.y - half_height < 0.0 {
        car.y = half_height;
    } else if car.y + half_height > state.height {
        car.y = state.height - half_height;
    }

    GameState {
        car,
        ..state.clone()
    }
}

// ── Obstacles ────────────────────────────────────────────────────────────────

/// Left edge and width of the road band.
pub fn road_band(width: f64) -> (f64, f64) {
    let road_width = width * ROAD_BAND;
    ((width - road_width) / 2.0, road_width)
}

/// Maybe spawn an obstacle. Only considered while accelerating, and only
/// once `min_spawn_interval` has passed since the last spawn.
pub fn try_spawn_obstacle(state: &GameState, keys: &HeldKeys, rng: &mut impl Rng) -> GameState {
    if !keys.contains(InputKey::Forward) {
        return state.clone();
    }
    if state.elapsed - state.last_spawn_time < state.settings.min_spawn_interval {
        return state.clone();
    }
    if rng.gen::<f64>() >= state.settings.spawn_chance {
        return state.clone();
    }

    let (road_x, road_width) = road_band(state.width);
    let spawn_x = road_x + rng.gen::<f64>() * road_width;
    log::debug!("spawning obstacle at x={spawn_x:.1} (t={:.2}s)", state.elapsed);

    let mut obstacles = state.obstacles.clone();
    obstacles.push(Obstacle::new(spawn_x, SPAWN_Y, 0.0));
    GameState {
        obstacles,
        last_spawn_time: state.elapsed,
        ..state.clone()
    }
}

/// Scroll obstacles against the car's vertical motion and retire the ones
/// that leave the bottom of the screen, scoring one point each.
pub fn update_obstacles(state: &GameState, delta_time: f64) -> GameState {
    let scroll = -state.car.vertical_velocity();
    let mut obstacles = state.obstacles.clone();
    let mut score = state.score;

    for i in (0..obstacles.len()).rev() {
        obstacles[i].velocity = scroll;
        obstacles[i].update(delta_time);
        if obstacles[i].is_off_screen(state.height) {
            obstacles.remove(i);
            score += 1;
        }
    }

    GameState {
        obstacles,
        score,
        ..state.clone()
    }
}

/// Axis-aligned overlap of two centred boxes.
fn boxes_overlap(a: (f64, f64, f64, f64), b: (f64, f64, f64, f64)) -> bool {
    let (ax, ay, aw, ah) = a;
    let (bx, by, bw, bh) = b;
    ax - aw / 2.0 < bx + bw / 2.0
        && ax + aw / 2.0 > bx - bw / 2.0
        && ay - ah / 2.0 < by + bh / 2.0
        && ay + ah / 2.0 > by - bh / 2.0
}

/// Every obstacle touching the car is removed, halves the car's velocity
/// and costs a point (score floors at zero).
pub fn check_obstacle_collisions(state: &GameState) -> GameState {
    let mut car = state.car.clone();
    let (car_width, car_height) = car.footprint();
    let car_box = (car.x, car.y, car_width, car_height);
    let mut obstacles = state.obstacles.clone();
    let mut score = state.score;

    for i in (0..obstacles.len()).rev() {
        let o = &obstacles[i];
        if boxes_overlap(car_box, (o.x, o.y, o.width, o.height)) {
            log::debug!("car hit obstacle at ({:.1}, {:.1})", o.x, o.y);
            car.velocity /= 2.0;
            obstacles.remove(i);
            score = score.saturating_sub(1);
        }
    }

    GameState {
        car,
        obstacles,
        score,
        ..state.clone()
    }
}

/// Push the car back inside any border its last step crossed.
pub fn check_border_collisions(state: &GameState, old_x: f64, old_y: f64) -> GameState {
    let mut car = state.car.clone();
    let (new_x, new_y) = (car.x, car.y);
    let borders = &state.borders;

    if borders.left.would_cross(old_x, old_y, new_x, new_y) {
        car.x = borders.left.boundary_coordinate() + 1.0;
        car.velocity = 0.0;
    }
    if borders.right.would_cross(old_x, old_y, new_x, new_y) {
        car.x = borders.right.boundary_coordinate() - 1.0;
        car.velocity = 0.0;
    }
    if borders.top.would_cross(old_x, old_y, new_x, new_y) {
        car.y = borders.top.boundary_coordinate() + 1.0;
    }

    GameState {
        car,
        ..state.clone()
    }
}

// ── Per-frame update ─────────────────────────────────────────────────────────

/// Advance the simulation by `delta_time` seconds. All randomness comes
/// through `rng` so callers control determinism.
pub fn update(
    state: &GameState,
    keys: &HeldKeys,
    delta_time: f64,
    rng: &mut impl Rng,
) -> GameState {
    let (old_x, old_y) = (state.car.x, state.car.y);

    let state = GameState {
        elapsed: state.elapsed + delta_time,
        frame: state.frame + 1,
        ..state.clone()
    };

    let state = handle_input(&state, keys, delta_time);
    let state = integrate_car(&state, delta_time);
    let state = keep_car_in_bounds(&state);
    let state = try_spawn_obstacle(&state, keys, rng);
    let state = update_obstacles(&state, delta_time);
    let state = check_obstacle_collisions(&state);
    check_border_collisions(&state, old_x, old_y)
}
