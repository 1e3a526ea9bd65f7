//! Data models for the chart services
//!
//! Plain values shared between the loader, the brush composite and the renderers.

pub mod ticker;
pub mod bounds;
pub mod layout;
pub mod tooltip;

// Re-export commonly used types for convenience
pub use ticker::{TickerDataPoint, millis_to_datetime};
pub use bounds::{Bounds, BrushExtent};
pub use layout::{Viewport, Margin, PaneRect, MAX_VIEWPORT_SIDE};
pub use tooltip::Tooltip;
