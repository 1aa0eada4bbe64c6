//! Drawing surface the renderer targets.
//!
//! Coordinates are world units. Implementations decide how to rasterise;
//! the renderer only promises to describe the current state in full before
//! calling `present`.

use std::io;

use crossterm::style::Color;

use crate::asset::Sprite;

/// Axis-aligned rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centred on (cx, cy).
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }
}

/// Which point of the text the anchor names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()>;

    fn stroke_rect(&mut self, rect: Rect, color: Color) -> io::Result<()>;

    /// Straight line; `dash` is an (on, off) pattern in world units.
    fn stroke_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        dash: Option<(f64, f64)>,
    ) -> io::Result<()>;

    /// Draw `sprite` centred on `center`, facing `rotation` radians.
    fn draw_sprite(&mut self, sprite: &Sprite, center: (f64, f64), rotation: f64)
        -> io::Result<()>;

    fn draw_text(
        &mut self,
        text: &str,
        anchor: (f64, f64),
        align: TextAlign,
        color: Color,
    ) -> io::Result<()>;

    /// Finish the frame.
    fn present(&mut self) -> io::Result<()>;
}
