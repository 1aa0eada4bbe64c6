use std::io;
use std::sync::Arc;

use crossterm::style::Color;
use road_racer::asset::{CarSprite, Sprite};
use road_racer::compute::init_state;
use road_racer::display::{render, TerminalSurface};
use road_racer::entities::*;
use road_racer::surface::{Rect, Surface, TextAlign};
use road_racer::Settings;

#[derive(Clone, Debug, PartialEq)]
enum Op {
    Fill(Rect),
    Stroke(Rect),
    Line((f64, f64), (f64, f64), Option<(f64, f64)>),
    Sprite((f64, f64), f64),
    Text(String, (f64, f64), TextAlign),
    Present,
}

/// Surface that only records what it was asked to draw.
#[derive(Default)]
struct RecordingSurface {
    ops: Vec<Op>,
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, _color: Color) -> io::Result<()> {
        self.ops.push(Op::Fill(rect));
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Color) -> io::Result<()> {
        self.ops.push(Op::Stroke(rect));
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        _color: Color,
        dash: Option<(f64, f64)>,
    ) -> io::Result<()> {
        self.ops.push(Op::Line(from, to, dash));
        Ok(())
    }

    fn draw_sprite(&mut self, _sprite: &Sprite, center: (f64, f64), rotation: f64) -> io::Result<()> {
        self.ops.push(Op::Sprite(center, rotation));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        anchor: (f64, f64),
        align: TextAlign,
        _color: Color,
    ) -> io::Result<()> {
        self.ops.push(Op::Text(text.to_string(), anchor, align));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.ops.push(Op::Present);
        Ok(())
    }
}

fn make_state() -> GameState {
    init_state(800.0, 600.0, Settings::default())
}

fn record(state: &GameState) -> Vec<Op> {
    let mut surface = RecordingSurface::default();
    render(&mut surface, state).unwrap();
    surface.ops
}

#[test]
fn frame_is_drawn_back_to_front() {
    let ops = record(&make_state());
    assert_eq!(ops[0], Op::Fill(Rect::new(0.0, 0.0, 800.0, 600.0)));
    assert_eq!(ops[1], Op::Fill(Rect::new(160.0, 0.0, 480.0, 600.0)));
    // Road edges, centre line, three borders
    assert_eq!(ops[2], Op::Line((160.0, 0.0), (160.0, 600.0), None));
    assert_eq!(ops[3], Op::Line((640.0, 0.0), (640.0, 600.0), None));
    assert_eq!(ops[4], Op::Line((400.0, 0.0), (400.0, 600.0), Some((30.0, 30.0))));
    assert_eq!(ops[5], Op::Line((50.0, 0.0), (50.0, 600.0), None));
    assert_eq!(ops[6], Op::Line((750.0, 0.0), (750.0, 600.0), None));
    assert_eq!(ops[7], Op::Line((0.0, 300.0), (800.0, 300.0), None));
    assert_eq!(ops.last(), Some(&Op::Present));
}

#[test]
fn score_is_right_aligned_and_last() {
    let mut s = make_state();
    s.score = 12;
    let ops = record(&s);
    let text = &ops[ops.len() - 2];
    assert_eq!(
        text,
        &Op::Text("Score: 12".to_string(), (780.0, 20.0), TextAlign::Right)
    );
}

#[test]
fn obstacles_drawn_before_car() {
    let mut s = make_state();
    s.obstacles.push(Obstacle::new(300.0, 100.0, 0.0));
    s.obstacles.push(Obstacle::new(500.0, 200.0, 0.0));
    let ops = record(&s);
    let first_obstacle = Rect::centered(300.0, 100.0, 40.0, 40.0);
    let car = Rect::centered(400.0, 510.0, 40.0, 40.0);
    let obstacle_at = ops.iter().position(|op| *op == Op::Fill(first_obstacle)).unwrap();
    let car_at = ops.iter().position(|op| *op == Op::Fill(car)).unwrap();
    assert!(obstacle_at < car_at);
    assert_eq!(ops[obstacle_at + 1], Op::Stroke(first_obstacle));
}

#[test]
fn placeholder_car_without_sprite() {
    let mut s = make_state();
    s.car.sprite = CarSprite::Failed;
    let ops = record(&s);
    assert!(ops.contains(&Op::Fill(Rect::centered(400.0, 510.0, 40.0, 40.0))));
    assert!(!ops.iter().any(|op| matches!(op, Op::Sprite(..))));
}

#[test]
fn loaded_sprite_drawn_with_heading() {
    let mut s = make_state();
    s.car.angle = 1.25;
    s.car.sprite = CarSprite::Loaded(Arc::new(Sprite::from_text("╓██╖\n╙██╜").unwrap()));
    let ops = record(&s);
    assert!(ops.contains(&Op::Sprite((400.0, 510.0), 1.25)));
}

#[test]
fn render_is_idempotent() {
    let mut s = make_state();
    s.obstacles.push(Obstacle::new(300.0, 100.0, 42.0));
    s.score = 3;
    let before = s.clone();
    let first = record(&s);
    let second = record(&s);
    assert_eq!(first, second);
    assert_eq!(s, before);
}

// ── Terminal surface ──────────────────────────────────────────────────────────

#[test]
fn terminal_frame_contains_score() {
    let mut s = make_state();
    s.score = 4;
    let mut buf: Vec<u8> = Vec::new();
    render(&mut TerminalSurface::new(&mut buf, 80, 30), &s).unwrap();
    let text = String::from_utf8_lossy(&buf);
    assert!(text.contains("Score: 4"));
}

#[test]
fn terminal_frame_draws_sprite_glyphs() {
    let mut s = make_state();
    s.car.sprite = CarSprite::Loaded(Arc::new(Sprite::from_text("╓██╖\n╙██╜").unwrap()));
    let mut buf: Vec<u8> = Vec::new();
    render(&mut TerminalSurface::new(&mut buf, 80, 30), &s).unwrap();
    let text = String::from_utf8_lossy(&buf);
    assert!(text.contains('╓'));
    assert!(text.contains('↓')); // default heading
}
