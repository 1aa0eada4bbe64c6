use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::sync::Arc;

use proptest::prelude::*;
use road_racer::asset::{CarSprite, Sprite};
use road_racer::entities::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Car ───────────────────────────────────────────────────────────────────────

#[test]
fn car_starts_facing_down_at_rest() {
    let car = Car::new(100.0, 200.0);
    assert_eq!(car.angle, FRAC_PI_2);
    assert_eq!(car.velocity, 0.0);
    assert_eq!(car.acceleration, 0.0);
    assert_eq!(car.sprite, CarSprite::NotLoaded);
}

#[test]
fn velocity_clamps_to_max_speed() {
    let mut car = Car::new(0.0, 0.0);
    car.velocity = 500.0;
    car.update(0.016, 450.0);
    assert_eq!(car.velocity, 450.0);

    car.velocity = -500.0;
    car.update(0.016, 450.0);
    assert_eq!(car.velocity, -450.0);
}

#[test]
fn acceleration_is_capped() {
    let mut car = Car::new(0.0, 0.0);
    car.acceleration = 1000.0;
    car.update(0.1, 450.0);
    assert_eq!(car.acceleration, 200.0);
    assert!(approx(car.velocity, 20.0));

    car.acceleration = -1000.0;
    car.update(0.1, 450.0);
    assert_eq!(car.acceleration, -200.0);
}

#[test]
fn position_uses_updated_heading() {
    // Heading turns from 0 to π/2 within the step, so all motion is vertical
    let mut car = Car::new(0.0, 0.0);
    car.angle = 0.0;
    car.velocity = 100.0;
    car.angle_velocity = FRAC_PI_2;
    car.update(1.0, 450.0);
    assert!(approx(car.x, 0.0));
    assert!(approx(car.y, 100.0));
}

#[test]
fn position_uses_updated_velocity() {
    let mut car = Car::new(0.0, 0.0);
    car.angle = 0.0;
    car.acceleration = 100.0;
    car.update(0.5, 450.0);
    // velocity 50 after the step, applied for 0.5 s
    assert!(approx(car.x, 25.0));
}

#[test]
fn heading_wraps_negative_angles() {
    let mut car = Car::new(0.0, 0.0);
    car.angle = 0.1;
    car.angle_velocity = -1.0;
    car.update(1.0, 450.0);
    assert!(approx(car.angle, TAU - 0.9));
}

#[test]
fn heading_wraps_past_full_turn() {
    let mut car = Car::new(0.0, 0.0);
    car.angle = 3.0 * PI / 2.0;
    car.angle_velocity = PI;
    car.update(1.0, 450.0);
    assert!(approx(car.angle, PI / 2.0));
}

#[test]
fn footprint_defaults_without_sprite() {
    let mut car = Car::new(0.0, 0.0);
    assert_eq!(car.image_width(), 0.0);
    assert_eq!(car.image_height(), 0.0);
    assert_eq!(car.footprint(), (40.0, 40.0));

    car.sprite = CarSprite::Failed;
    assert_eq!(car.footprint(), (40.0, 40.0));
}

#[test]
fn footprint_follows_loaded_sprite() {
    let mut car = Car::new(0.0, 0.0);
    let sprite = Sprite::from_text("████████\n").unwrap();
    car.sprite = CarSprite::Loaded(Arc::new(sprite));
    assert_eq!(car.image_width(), 80.0);
    assert_eq!(car.image_height(), 20.0);
    assert_eq!(car.footprint(), (80.0, 20.0));
}

proptest! {
    #[test]
    fn update_keeps_car_within_limits(
        acceleration in -10_000.0f64..10_000.0,
        velocity in -10_000.0f64..10_000.0,
        angle in 0.0f64..TAU,
        angle_velocity in -50.0f64..50.0,
        delta_time in 0.0f64..1.0,
        max_speed in 0.1f64..1_000.0,
    ) {
        let mut car = Car::new(0.0, 0.0);
        car.acceleration = acceleration;
        car.velocity = velocity;
        car.angle = angle;
        car.angle_velocity = angle_velocity;
        car.update(delta_time, max_speed);

        prop_assert!(car.acceleration.abs() <= 200.0);
        prop_assert!(car.velocity.abs() <= max_speed);
        prop_assert!(car.angle >= 0.0 && car.angle < TAU);
    }
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

#[test]
fn obstacle_integrates_vertically() {
    let mut obstacle = Obstacle::new(10.0, 100.0, 50.0);
    obstacle.update(1.0);
    assert_eq!(obstacle.y, 150.0);
    assert_eq!(obstacle.x, 10.0);
    assert_eq!((obstacle.width, obstacle.height), (40.0, 40.0));
}

#[test]
fn obstacle_off_screen_needs_full_margin() {
    let mut obstacle = Obstacle::new(0.0, 140.0, 0.0);
    assert!(!obstacle.is_off_screen(100.0));
    obstacle.y = 140.5;
    assert!(obstacle.is_off_screen(100.0));
}

#[test]
fn obstacle_moving_up_never_leaves_bottom() {
    let mut obstacle = Obstacle::new(0.0, -50.0, -100.0);
    for _ in 0..10 {
        obstacle.update(0.1);
        assert!(!obstacle.is_off_screen(600.0));
    }
    assert!((obstacle.y + 150.0).abs() < 1e-9);
}

// ── Held keys ─────────────────────────────────────────────────────────────────

#[test]
fn held_keys_membership() {
    let keys: HeldKeys = [InputKey::Forward, InputKey::TurnLeft].into_iter().collect();
    assert!(keys.contains(InputKey::Forward));
    assert!(keys.contains(InputKey::TurnLeft));
    assert!(!keys.contains(InputKey::Back));
    assert!(!keys.is_empty());
    assert!(HeldKeys::none().is_empty());
}
