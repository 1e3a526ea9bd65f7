//! Viewport and pane geometry models

/// Largest accepted viewport side in pixels
pub const MAX_VIEWPORT_SIDE: f64 = 16_384.0;

/// Outer size of the drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Both sides finite and within `[1, MAX_VIEWPORT_SIDE]`
    pub fn is_drawable(&self) -> bool {
        let side_ok = |side: f64| side.is_finite() && (1.0..=MAX_VIEWPORT_SIDE).contains(&side);
        side_ok(self.width) && side_ok(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Plot rectangle of one pane, positioned in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PaneRect {
    /// Pane-local coordinates if the viewport point falls inside the rectangle
    pub fn to_local(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lx, ly) = (x - self.left, y - self.top);
        if lx >= 0.0 && lx <= self.width && ly >= 0.0 && ly <= self.height {
            Some((lx, ly))
        } else {
            None
        }
    }
}
