use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};
use crate::models::{Bounds, BrushExtent, PaneRect, TickerDataPoint, Tooltip, Viewport};
use crate::utils::Debouncer;
use super::layout_service::DashboardLayout;
use super::scale_service::{close_extent, close_scale, LinearScale, TimeScale};
use super::tooltip_service::TooltipTracker;

/// How many trailing points the detail chart shows on load
pub const INITIAL_VISIBLE_DATA_LENGTH: usize = 365;
/// Width of the grab areas at each end of the brush selection
pub const BRUSH_HANDLE_SIZE: f64 = 8.0;
/// Quiet period before a brush drag recomputes the detail chart
pub const BRUSH_DEBOUNCE: Duration = Duration::from_millis(150);

/// Which path produced the current detail value scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleTrigger {
    Filter,
    Brush,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    /// Drawing a fresh selection from `origin`
    Select { origin: f64 },
    /// Sliding the whole selection
    Move { origin: f64, start: BrushExtent },
    /// Dragging one edge while the other stays at `anchor`
    Resize { side: Side, anchor: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    mode: DragMode,
    /// Clamped pointer position at press time
    start_x: f64,
    moved: bool,
}

/// Outcome of a brush pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushEvent {
    Change(BrushExtent),
    Click,
    Idle,
}

/// Horizontal brush over the overview pane, in pane-local pixels
#[derive(Debug, Clone)]
pub struct Brush {
    width: f64,
    height: f64,
    extent: Option<BrushExtent>,
    drag: Option<Drag>,
}

impl Brush {
    pub fn new(width: f64, height: f64, extent: Option<BrushExtent>) -> Self {
        Self { width, height, extent, drag: None }
    }

    pub fn extent(&self) -> Option<BrushExtent> {
        self.extent
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn clamp(&self, x: f64) -> f64 {
        x.clamp(0.0, self.width)
    }

    pub fn pointer_down(&mut self, x: f64) {
        let x = self.clamp(x);
        let half_handle = BRUSH_HANDLE_SIZE / 2.0;

        let mode = match self.extent {
            Some(ext) if (x - ext.x0).abs() <= half_handle => {
                DragMode::Resize { side: Side::Left, anchor: ext.x1 }
            }
            Some(ext) if (x - ext.x1).abs() <= half_handle => {
                DragMode::Resize { side: Side::Right, anchor: ext.x0 }
            }
            Some(ext) if x > ext.x0 && x < ext.x1 => DragMode::Move { origin: x, start: ext },
            _ => DragMode::Select { origin: x },
        };

        debug!("Brush drag started: {:?}", mode);
        self.drag = Some(Drag { mode, start_x: x, moved: false });
    }

    pub fn pointer_move(&mut self, x: f64) -> BrushEvent {
        let x = self.clamp(x);
        let Some(drag) = self.drag.as_mut() else {
            return BrushEvent::Idle;
        };
        if x != drag.start_x {
            drag.moved = true;
        }

        let extent = match drag.mode {
            DragMode::Select { origin } => BrushExtent::new(origin, x),
            DragMode::Move { origin, start } => {
                let dx = (x - origin).clamp(-start.x0, self.width - start.x1);
                BrushExtent::new(start.x0 + dx, start.x1 + dx)
            }
            DragMode::Resize { anchor, .. } => BrushExtent::new(anchor, x),
        };

        self.extent = Some(extent);
        BrushEvent::Change(extent)
    }

    /// Finish a drag. A release that never left the press position is a click:
    /// on empty space it clears the selection, on the selection it keeps it.
    pub fn pointer_up(&mut self, x: f64) -> BrushEvent {
        let Some(drag) = self.drag else {
            return BrushEvent::Idle;
        };
        let x = self.clamp(x);
        let is_select = matches!(drag.mode, DragMode::Select { .. });

        let event = if !drag.moved && x == drag.start_x {
            if is_select {
                self.extent = None;
            }
            BrushEvent::Click
        } else {
            match self.pointer_move(x) {
                BrushEvent::Change(extent) if is_select && extent.width() == 0.0 => {
                    self.extent = None;
                    BrushEvent::Click
                }
                event => event,
            }
        };

        self.drag = None;
        event
    }

    /// Adopt a new pane size, with the selection already mapped into it
    pub fn set_size(&mut self, width: f64, height: f64, extent: Option<BrushExtent>) {
        self.width = width;
        self.height = height;
        self.extent = extent;
        self.drag = None;
    }
}

/// Overview/detail composite: a detail chart whose window follows the brush
/// on the overview chart
#[derive(Debug)]
pub struct BrushChart {
    data: Vec<TickerDataPoint>,
    filtered: Vec<TickerDataPoint>,
    layout: DashboardLayout,
    date_scale: TimeScale,
    brush_date_scale: TimeScale,
    stock_scale: Option<LinearScale>,
    brush_stock_scale: LinearScale,
    value_extent: (f64, f64),
    last_trigger: ScaleTrigger,
    brush: Brush,
    tooltip: TooltipTracker,
    pending: Debouncer<Bounds>,
}

impl BrushChart {
    pub fn new(
        data: Vec<TickerDataPoint>,
        viewport: Viewport,
        initial_visible: usize,
        debounce: Duration,
    ) -> Self {
        let layout = DashboardLayout::compute(viewport);
        let filtered = data[data.len().saturating_sub(initial_visible)..].to_vec();
        let brush_date_scale = TimeScale::from_points(&data, (0.0, layout.overview.width));
        let brush_stock_scale = overview_scale(&data, layout.overview.height);
        let initial_extent = initial_brush_extent(&data, initial_visible, &brush_date_scale);

        let mut chart = Self {
            brush: Brush::new(layout.overview.width, layout.overview.height, initial_extent),
            data,
            filtered,
            layout,
            date_scale: TimeScale::new((0.0, 0.0), (0.0, layout.detail.width)),
            brush_date_scale,
            stock_scale: None,
            brush_stock_scale,
            value_extent: (0.0, 0.0),
            last_trigger: ScaleTrigger::Filter,
            tooltip: TooltipTracker::new(),
            pending: Debouncer::new(debounce),
        };
        chart.recompute_from_filter();

        info!(
            "📊 Brush chart ready: {} points, {} visible",
            chart.data.len(),
            chart.filtered.len()
        );
        chart
    }

    pub fn data(&self) -> &[TickerDataPoint] {
        &self.data
    }

    pub fn filtered(&self) -> &[TickerDataPoint] {
        &self.filtered
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    pub fn date_scale(&self) -> &TimeScale {
        &self.date_scale
    }

    pub fn brush_date_scale(&self) -> &TimeScale {
        &self.brush_date_scale
    }

    pub fn stock_scale(&self) -> Option<&LinearScale> {
        self.stock_scale.as_ref()
    }

    pub fn brush_stock_scale(&self) -> &LinearScale {
        &self.brush_stock_scale
    }

    /// Raw min/max close of the visible window, before nice rounding
    pub fn value_extent(&self) -> (f64, f64) {
        self.value_extent
    }

    pub fn last_trigger(&self) -> ScaleTrigger {
        self.last_trigger
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.current()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Recompute the detail scales from the current window (non-brush path)
    fn recompute_from_filter(&mut self) {
        let detail = self.layout.detail;
        self.date_scale = TimeScale::from_points(&self.filtered, (0.0, detail.width));
        self.value_extent = close_extent(&self.filtered);
        if detail.height > 0.0 {
            self.stock_scale = Some(close_scale(&self.filtered, detail.height));
        }
        self.last_trigger = ScaleTrigger::Filter;
        self.tooltip.hide();
    }

    /// Install a new visible window and recompute its scales
    pub fn set_filtered(&mut self, points: Vec<TickerDataPoint>) {
        self.filtered = points;
        self.recompute_from_filter();
    }

    pub fn reset_to_full(&mut self) {
        info!("🔄 Brush cleared, showing all {} points", self.data.len());
        self.set_filtered(self.data.clone());
    }

    /// Queue a brush change; only the last one in a burst is applied
    pub fn on_brush_change(&mut self, bounds: Bounds, now: Instant) {
        self.pending.schedule(bounds, now);
    }

    /// Apply the queued brush change if its quiet period has passed
    pub fn flush_pending(&mut self, now: Instant) -> bool {
        match self.pending.take_due(now) {
            Some(bounds) => {
                self.apply_brush(bounds);
                true
            }
            None => false,
        }
    }

    /// Filter the full dataset by the brush bounds and rescale the detail chart
    pub fn apply_brush(&mut self, bounds: Bounds) {
        let subset: Vec<TickerDataPoint> = self
            .data
            .iter()
            .filter(|p| bounds.contains(p.timestamp_millis(), p.close))
            .copied()
            .collect();

        let detail = self.layout.detail;
        self.value_extent = close_extent(&subset);
        self.stock_scale = Some(close_scale(&subset, detail.height));
        self.date_scale = TimeScale::from_points(&subset, (0.0, detail.width));
        self.filtered = subset;
        self.last_trigger = ScaleTrigger::Brush;
        self.tooltip.hide();

        debug!(
            "Brush applied: {} points, close extent {:?}",
            self.filtered.len(),
            self.value_extent
        );
    }

    /// Data-space bounds of a pixel selection on the overview pane
    pub fn bounds_for(&self, extent: BrushExtent) -> Bounds {
        Bounds {
            x0: self.brush_date_scale.invert(extent.x0),
            x1: self.brush_date_scale.invert(extent.x1),
            y0: self.brush_stock_scale.invert(self.layout.overview.height),
            y1: self.brush_stock_scale.invert(0.0),
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if let Some((local_x, _)) = self.layout.overview.to_local(x, y) {
            self.brush.pointer_down(local_x);
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) {
        // a drag keeps following the pointer outside the overview pane
        if self.brush.is_dragging() {
            if let BrushEvent::Change(extent) = self.brush.pointer_move(x - self.layout.overview.left) {
                self.on_brush_change(self.bounds_for(extent), now);
            }
            return;
        }

        match self.stock_scale {
            Some(stock_scale) => self.tooltip.pointer_move(
                x,
                y,
                &self.layout.detail,
                &self.filtered,
                &self.date_scale,
                &stock_scale,
            ),
            None => self.tooltip.hide(),
        }
    }

    pub fn pointer_up(&mut self, x: f64, _y: f64, now: Instant) {
        match self.brush.pointer_up(x - self.layout.overview.left) {
            BrushEvent::Click => {
                self.pending.cancel();
                self.reset_to_full();
            }
            BrushEvent::Change(extent) => self.on_brush_change(self.bounds_for(extent), now),
            BrushEvent::Idle => {}
        }
    }

    pub fn pointer_leave(&mut self) {
        self.tooltip.hide();
    }

    /// Re-derive every scale for a new viewport, keeping the brush on the same dates
    pub fn resize(&mut self, viewport: Viewport) {
        let selected_dates = self
            .brush
            .extent()
            .map(|e| (self.brush_date_scale.invert(e.x0), self.brush_date_scale.invert(e.x1)));

        self.layout = DashboardLayout::compute(viewport);
        let overview: PaneRect = self.layout.overview;
        self.brush_date_scale = self.brush_date_scale.with_range((0.0, overview.width));
        self.brush_stock_scale = overview_scale(&self.data, overview.height);

        let extent = selected_dates.map(|(t0, t1)| {
            BrushExtent::new(self.brush_date_scale.map_millis(t0), self.brush_date_scale.map_millis(t1))
        });
        self.brush.set_size(overview.width, overview.height, extent);
        self.recompute_from_filter();

        debug!("Resized to {}x{}", viewport.width, viewport.height);
    }
}

/// Overview value scale: zero up to the highest close, nice-rounded
fn overview_scale(data: &[TickerDataPoint], height: f64) -> LinearScale {
    let (_, max_close) = close_extent(data);
    LinearScale::new((0.0, max_close), (height, 0.0)).nice()
}

/// Pixel span from the first visible point to the last point
fn initial_brush_extent(
    data: &[TickerDataPoint],
    initial_visible: usize,
    scale: &TimeScale,
) -> Option<BrushExtent> {
    let end = data.last()?;
    let start = if data.len() > initial_visible {
        &data[data.len() - initial_visible]
    } else {
        &data[0]
    };
    Some(BrushExtent::new(scale.map_point(start), scale.map_point(end)))
}
