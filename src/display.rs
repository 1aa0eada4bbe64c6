/// Rendering layer.
///
/// `render` receives a drawing surface and an immutable view of the game
/// state. No game logic is performed here; this module only translates
/// state into drawing calls. `TerminalSurface` is the crossterm-backed
/// surface the binary uses.

use std::f64::consts::FRAC_PI_4;
use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::asset::{CarSprite, Sprite};
use crate::compute::road_band;
use crate::consts::*;
use crate::entities::{Car, GameState, Obstacle};
use crate::surface::{Rect, Surface, TextAlign};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::Rgb { r: 0x2c, g: 0x3e, b: 0x50 };
const C_ROAD: Color = Color::Rgb { r: 0x34, g: 0x49, b: 0x5e };
const C_ROAD_EDGE: Color = Color::White;
const C_CENTER_LINE: Color = Color::Rgb { r: 0xf1, g: 0xc4, b: 0x0f };
const C_BORDER: Color = Color::Rgb { r: 0xe7, g: 0x4c, b: 0x3c };
const C_OBSTACLE: Color = Color::Rgb { r: 0xe7, g: 0x4c, b: 0x3c };
const C_OUTLINE: Color = Color::White;
const C_CAR: Color = Color::White;
const C_SCORE: Color = Color::White;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame, back to front.
pub fn render<S: Surface>(surface: &mut S, state: &GameState) -> io::Result<()> {
    surface.fill_rect(Rect::new(0.0, 0.0, state.width, state.height), C_BACKGROUND)?;

    draw_road(surface, state)?;
    draw_center_line(surface, state)?;

    for border in state.borders.iter() {
        surface.stroke_line((border.x1, border.y1), (border.x2, border.y2), C_BORDER, None)?;
    }
    for obstacle in &state.obstacles {
        draw_obstacle(surface, obstacle)?;
    }

    draw_car(surface, &state.car)?;
    draw_score(surface, state)?;

    surface.present()
}

// ── Road ──────────────────────────────────────────────────────────────────────

fn draw_road<S: Surface>(surface: &mut S, state: &GameState) -> io::Result<()> {
    let (road_x, road_width) = road_band(state.width);
    surface.fill_rect(Rect::new(road_x, 0.0, road_width, state.height), C_ROAD)?;
    surface.stroke_line((road_x, 0.0), (road_x, state.height), C_ROAD_EDGE, None)?;
    let right = road_x + road_width;
    surface.stroke_line((right, 0.0), (right, state.height), C_ROAD_EDGE, None)
}

fn draw_center_line<S: Surface>(surface: &mut S, state: &GameState) -> io::Result<()> {
    let center_x = state.width / 2.0;
    surface.stroke_line(
        (center_x, 0.0),
        (center_x, state.height),
        C_CENTER_LINE,
        Some(CENTER_DASH),
    )
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_obstacle<S: Surface>(surface: &mut S, obstacle: &Obstacle) -> io::Result<()> {
    let rect = Rect::centered(obstacle.x, obstacle.y, obstacle.width, obstacle.height);
    surface.fill_rect(rect, C_OBSTACLE)?;
    surface.stroke_rect(rect, C_OUTLINE)
}

fn draw_car<S: Surface>(surface: &mut S, car: &Car) -> io::Result<()> {
    match &car.sprite {
        CarSprite::Loaded(sprite) => surface.draw_sprite(sprite, (car.x, car.y), car.angle),
        CarSprite::NotLoaded | CarSprite::Failed => {
            // Placeholder block
            let rect = Rect::centered(car.x, car.y, DEFAULT_FOOTPRINT, DEFAULT_FOOTPRINT);
            surface.fill_rect(rect, C_OBSTACLE)?;
            surface.stroke_rect(rect, C_OUTLINE)
        }
    }
}

fn draw_score<S: Surface>(surface: &mut S, state: &GameState) -> io::Result<()> {
    surface.draw_text(
        &format!("Score: {}", state.score),
        (state.width - SCORE_PADDING, SCORE_PADDING),
        TextAlign::Right,
        C_SCORE,
    )
}

// ── Terminal surface ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
    bg: Color::Reset,
};

/// A crossterm surface. Drawing goes into a cell buffer; `present` writes
/// the whole buffer in one pass.
pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            cells: vec![BLANK; cols as usize * rows as usize],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![BLANK; cols as usize * rows as usize];
    }

    /// Cell containing world point (x, y), if on screen.
    fn cell_at(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x / CELL_WIDTH).floor();
        let row = (y / CELL_HEIGHT).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f64 || row >= self.rows as f64 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn cell_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(index)
    }

    /// Put a glyph, keeping whatever background is already there.
    fn put(&mut self, col: u16, row: u16, ch: char, fg: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    /// Column/row span covered by a rectangle, clipped to the screen.
    fn span(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let first_col = (rect.x / CELL_WIDTH).floor().max(0.0);
        let first_row = (rect.y / CELL_HEIGHT).floor().max(0.0);
        // Right/bottom edges are exclusive
        let last_col = ((rect.x + rect.width) / CELL_WIDTH).ceil() - 1.0;
        let last_row = ((rect.y + rect.height) / CELL_HEIGHT).ceil() - 1.0;
        let last_col = last_col.min(self.cols as f64 - 1.0);
        let last_row = last_row.min(self.rows as f64 - 1.0);
        if last_col < first_col || last_row < first_row {
            return None;
        }
        Some((first_col as u16, first_row as u16, last_col as u16, last_row as u16))
    }
}

/// Arrow pointing along `angle` (screen coordinates, y down).
fn heading_glyph(angle: f64) -> char {
    const ARROWS: [char; 8] = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];
    let step = (angle / FRAC_PI_4).round().rem_euclid(8.0) as usize;
    ARROWS[step]
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        if let Some((c0, r0, c1, r1)) = self.span(rect) {
            for row in r0..=r1 {
                for col in c0..=c1 {
                    if let Some(cell) = self.cell_mut(col, row) {
                        *cell = Cell {
                            ch: ' ',
                            fg: Color::Reset,
                            bg: color,
                        };
                    }
                }
            }
        }
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) -> io::Result<()> {
        let Some((c0, r0, c1, r1)) = self.span(rect) else {
            return Ok(());
        };
        for col in c0..=c1 {
            self.put(col, r0, '─', color);
            self.put(col, r1, '─', color);
        }
        for row in r0..=r1 {
            self.put(c0, row, '│', color);
            self.put(c1, row, '│', color);
        }
        self.put(c0, r0, '┌', color);
        self.put(c1, r0, '┐', color);
        self.put(c0, r1, '└', color);
        self.put(c1, r1, '┘', color);
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        dash: Option<(f64, f64)>,
    ) -> io::Result<()> {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        let glyph = if dx.abs() < dy.abs() / 2.0 {
            '│'
        } else if dy.abs() < dx.abs() / 2.0 {
            '─'
        } else {
            '·'
        };

        // Half a cell per step so no cell is skipped
        let step = CELL_WIDTH.min(CELL_HEIGHT) / 2.0;
        let steps = (length / step).ceil() as usize;
        for i in 0..=steps {
            let travelled = (i as f64 * step).min(length);
            if let Some((on, off)) = dash {
                if travelled % (on + off) >= on {
                    continue;
                }
            }
            let t = if length > 0.0 { travelled / length } else { 0.0 };
            if let Some((col, row)) = self.cell_at(from.0 + dx * t, from.1 + dy * t) {
                self.put(col, row, glyph, color);
            }
        }
        Ok(())
    }

    fn draw_sprite(
        &mut self,
        sprite: &Sprite,
        center: (f64, f64),
        rotation: f64,
    ) -> io::Result<()> {
        let left = ((center.0 - sprite.width / 2.0) / CELL_WIDTH).floor() as i32;
        let top = ((center.1 - sprite.height / 2.0) / CELL_HEIGHT).floor() as i32;
        for (dy, line) in sprite.rows.iter().enumerate() {
            for (dx, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let (col, row) = (left + dx as i32, top + dy as i32);
                if let (Ok(col), Ok(row)) = (u16::try_from(col), u16::try_from(row)) {
                    self.put(col, row, ch, C_CAR);
                }
            }
        }
        if let Some((col, row)) = self.cell_at(center.0, center.1) {
            self.put(col, row, heading_glyph(rotation), C_CAR);
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        anchor: (f64, f64),
        align: TextAlign,
        color: Color,
    ) -> io::Result<()> {
        let len = text.chars().count() as i32;
        let anchor_col = (anchor.0 / CELL_WIDTH).floor() as i32;
        let row = (anchor.1 / CELL_HEIGHT).floor() as i32;
        let start = match align {
            TextAlign::Left => anchor_col,
            TextAlign::Right => anchor_col - len,
        };
        let Ok(row) = u16::try_from(row) else {
            return Ok(());
        };
        for (i, ch) in text.chars().enumerate() {
            // Off-screen columns, including ones past u16, are skipped
            if let Ok(col) = u16::try_from(start + i as i32) {
                self.put(col, row, ch, color);
            }
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let mut fg = Color::Reset;
        let mut bg = Color::Reset;
        self.out.queue(style::ResetColor)?;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if cell.fg != fg {
                    self.out.queue(style::SetForegroundColor(cell.fg))?;
                    fg = cell.fg;
                }
                if cell.bg != bg {
                    self.out.queue(style::SetBackgroundColor(cell.bg))?;
                    bg = cell.bg;
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        self.cells.fill(BLANK);
        Ok(())
    }
}
