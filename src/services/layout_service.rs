use crate::models::{Margin, PaneRect, Viewport};

/// Outer margin of the detail chart
pub const DETAIL_MARGIN: Margin = Margin { top: 20.0, right: 20.0, bottom: 20.0, left: 50.0 };
/// Margin around the overview chart that hosts the brush
pub const BRUSH_MARGIN: Margin = Margin { top: 10.0, right: 20.0, bottom: 15.0, left: 50.0 };
/// Vertical gap between the detail and overview charts
pub const CHART_SEPARATION: f64 = 30.0;
/// Space under the detail chart reserved for its bottom axis
pub const TOP_CHART_BOTTOM_MARGIN: f64 = CHART_SEPARATION + 10.0;
/// Share of the inner height given to the detail chart
const TOP_CHART_SHARE: f64 = 0.8;

/// Pixel geometry of the overview/detail composite for one viewport size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardLayout {
    pub viewport: Viewport,
    pub detail: PaneRect,
    pub overview: PaneRect,
}

impl DashboardLayout {
    pub fn compute(viewport: Viewport) -> Self {
        let margin = DETAIL_MARGIN;
        let inner_height = viewport.height - margin.top - margin.bottom;
        let top_chart_height = TOP_CHART_SHARE * inner_height - TOP_CHART_BOTTOM_MARGIN;
        let bottom_chart_height = inner_height - top_chart_height - CHART_SEPARATION;

        let detail = PaneRect {
            left: margin.left,
            top: margin.top,
            width: (viewport.width - margin.left - margin.right).max(0.0),
            height: top_chart_height.max(0.0),
        };

        let overview = PaneRect {
            left: BRUSH_MARGIN.left,
            top: top_chart_height + TOP_CHART_BOTTOM_MARGIN + margin.top,
            width: (viewport.width - BRUSH_MARGIN.left - BRUSH_MARGIN.right).max(0.0),
            height: (bottom_chart_height - BRUSH_MARGIN.top - BRUSH_MARGIN.bottom).max(0.0),
        };

        Self { viewport, detail, overview }
    }
}
