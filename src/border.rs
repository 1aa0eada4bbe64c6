//! Straight boundary segments the car may not drive through.

/// Endpoints closer than this on an axis make the segment axis-aligned.
const AXIS_TOLERANCE: f64 = 0.001;

/// A vertical or horizontal segment from (x1, y1) to (x2, y2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Border {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_vertical(&self) -> bool {
        (self.x2 - self.x1).abs() < AXIS_TOLERANCE
    }

    /// Did a step from (old_x, old_y) to (new_x, new_y) cross this segment?
    ///
    /// Only the post-step coordinate is checked against the segment span.
    pub fn would_cross(&self, old_x: f64, old_y: f64, new_x: f64, new_y: f64) -> bool {
        if self.is_vertical() {
            let border_x = self.x1;
            if transitions(old_x, new_x, border_x) {
                return within(new_y, self.y1, self.y2);
            }
            return false;
        }

        let border_y = self.y1;
        if transitions(old_y, new_y, border_y) {
            return within(new_x, self.x1, self.x2);
        }
        false
    }

    /// The pinned coordinate: x for a vertical border, y otherwise.
    pub fn boundary_coordinate(&self) -> f64 {
        if self.is_vertical() {
            self.x1
        } else {
            self.y1
        }
    }
}

fn transitions(old: f64, new: f64, line: f64) -> bool {
    (old < line && new >= line) || (old > line && new <= line)
}

fn within(value: f64, a: f64, b: f64) -> bool {
    value >= a.min(b) && value <= a.max(b)
}

/// The three live borders of the road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Borders {
    pub left: Border,
    pub right: Border,
    pub top: Border,
}

impl Borders {
    pub fn new(width: f64, height: f64, offset: f64, top_ratio: f64) -> Self {
        let mut borders = Self {
            left: Border::new(0.0, 0.0, 0.0, 0.0),
            right: Border::new(0.0, 0.0, 0.0, 0.0),
            top: Border::new(0.0, 0.0, 0.0, 0.0),
        };
        borders.reposition(width, height, offset, top_ratio);
        borders
    }

    /// Move the existing borders to fit a viewport of `width` x `height`.
    pub fn reposition(&mut self, width: f64, height: f64, offset: f64, top_ratio: f64) {
        self.left.x1 = offset;
        self.left.y1 = 0.0;
        self.left.x2 = offset;
        self.left.y2 = height;

        self.right.x1 = width - offset;
        self.right.y1 = 0.0;
        self.right.x2 = width - offset;
        self.right.y2 = height;

        let top_y = height * top_ratio;
        self.top.x1 = 0.0;
        self.top.y1 = top_y;
        self.top.x2 = width;
        self.top.y2 = top_y;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Border> {
        [&self.left, &self.right, &self.top].into_iter()
    }
}
