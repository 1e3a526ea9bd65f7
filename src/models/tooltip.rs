//! Tooltip models

use super::TickerDataPoint;

/// The hovered point and where its markers sit, in pane-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    pub point: TickerDataPoint,
    pub left: f64,
    pub top: f64,
}
