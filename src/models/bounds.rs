//! Brush selection models

/// Brush selection in data space: x in epoch milliseconds, y in price units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Bounds {
    /// Exclusive containment on both axes
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x0 && x < self.x1 && y > self.y0 && y < self.y1
    }
}

/// Horizontal pixel extent of the brush selection inside the overview pane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushExtent {
    pub x0: f64,
    pub x1: f64,
}

impl BrushExtent {
    pub fn new(a: f64, b: f64) -> Self {
        Self { x0: a.min(b), x1: a.max(b) }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}
