use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};
use crate::config::AppConfig;
use crate::models::{TickerDataPoint, Viewport, MAX_VIEWPORT_SIDE};
use crate::services::brush_service::{BrushChart, ScaleTrigger};
use crate::services::chart_service::{self, Scene};

/// Whether the dataset has arrived yet
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(Box<BrushChart>),
}

/// Which renderer `render` paints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    Brush,
    Line,
    Candlestick,
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brush" | "area" => Ok(ChartType::Brush),
            "line" => Ok(ChartType::Line),
            "candlestick" | "candle" | "ohlc" => Ok(ChartType::Candlestick),
            other => Err(format!("Unknown view '{}'. Use brush, line or candlestick", other)),
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartType::Brush => "brush",
            ChartType::Line => "line",
            ChartType::Candlestick => "candlestick",
        };
        write!(f, "{}", name)
    }
}

/// Top-level state owned by the event loop
#[derive(Debug)]
pub struct App {
    viewport: Viewport,
    state: LoadState,
    view: ChartType,
    initial_visible: usize,
    debounce: Duration,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            viewport: config.viewport,
            state: LoadState::Loading,
            view: ChartType::Brush,
            initial_visible: config.initial_visible,
            debounce: config.debounce,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn chart(&self) -> Option<&BrushChart> {
        match &self.state {
            LoadState::Ready(chart) => Some(&**chart),
            LoadState::Loading => None,
        }
    }

    fn chart_mut(&mut self) -> Option<&mut BrushChart> {
        match &mut self.state {
            LoadState::Ready(chart) => Some(&mut **chart),
            LoadState::Loading => None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn view(&self) -> ChartType {
        self.view
    }

    pub fn set_view(&mut self, view: ChartType) {
        debug!("Switching view to {}", view);
        self.view = view;
    }

    /// Install the loaded dataset and build the composite for the current viewport
    pub fn on_loaded(&mut self, data: Vec<TickerDataPoint>) {
        info!("✅ Dataset ready with {} points", data.len());
        let chart = BrushChart::new(data, self.viewport, self.initial_visible, self.debounce);
        self.state = LoadState::Ready(Box::new(chart));
    }

    // Pointer events are dropped while loading

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if let Some(chart) = self.chart_mut() {
            chart.pointer_down(x, y);
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) {
        if let Some(chart) = self.chart_mut() {
            chart.pointer_move(x, y, now);
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, now: Instant) {
        if let Some(chart) = self.chart_mut() {
            chart.pointer_up(x, y, now);
        }
    }

    pub fn click(&mut self, x: f64, y: f64, now: Instant) {
        self.pointer_down(x, y);
        self.pointer_up(x, y, now);
    }

    pub fn pointer_leave(&mut self) {
        if let Some(chart) = self.chart_mut() {
            chart.pointer_leave();
        }
    }

    pub fn resize(&mut self, viewport: Viewport) -> Result<(), String> {
        if !viewport.is_drawable() {
            return Err(format!(
                "Viewport must be between 1 and {} pixels per side, got {}x{}",
                MAX_VIEWPORT_SIDE, viewport.width, viewport.height
            ));
        }
        self.viewport = viewport;
        if let Some(chart) = self.chart_mut() {
            chart.resize(viewport);
        }
        Ok(())
    }

    /// When the event loop next has to wake up for a debounced brush change
    pub fn next_deadline(&self) -> Option<Instant> {
        self.chart().and_then(|chart| chart.next_deadline())
    }

    /// Apply a due brush change; true when the visible window changed
    pub fn flush(&mut self, now: Instant) -> bool {
        self.chart_mut().map_or(false, |chart| chart.flush_pending(now))
    }

    /// Apply a pending brush change right away, as if its deadline had passed
    pub fn flush_now(&mut self) -> bool {
        match self.next_deadline() {
            Some(deadline) => self.flush(deadline),
            None => false,
        }
    }

    pub fn scene(&self) -> Option<Scene<'_>> {
        let chart = self.chart()?;
        Some(match self.view {
            ChartType::Brush => Scene::Brush(chart),
            ChartType::Line => Scene::Line { points: chart.data(), viewport: self.viewport },
            ChartType::Candlestick => Scene::Candlestick { points: chart.data(), viewport: self.viewport },
        })
    }

    pub fn render(&self, path: &Path) -> Result<(), String> {
        let scene = self.scene().ok_or_else(|| "Still loading, nothing to render yet".to_string())?;
        chart_service::render_to_file(&scene, path).map_err(|e| format!("Failed to render chart: {}", e))
    }

    pub fn status(&self) -> String {
        let Some(chart) = self.chart() else {
            return "Loading...".to_string();
        };

        let filtered = chart.filtered();
        let range = match (filtered.first(), filtered.last()) {
            (Some(first), Some(last)) => format!("{}..{}", first.date, last.date),
            _ => "empty".to_string(),
        };
        let (lo, hi) = chart.value_extent();
        let trigger = match chart.last_trigger() {
            ScaleTrigger::Filter => "filter",
            ScaleTrigger::Brush => "brush",
        };
        let brush = match chart.brush().extent() {
            Some(extent) => format!("[{:.1}, {:.1}]", extent.x0, extent.x1),
            None => "none".to_string(),
        };
        let tooltip = match chart.tooltip() {
            Some(tooltip) => format!("{} close {:.2}", tooltip.point.date, tooltip.point.close),
            None => "hidden".to_string(),
        };

        format!(
            "view={} viewport={}x{} points={} visible={} range={} close=[{:.2}, {:.2}] trigger={} brush={} tooltip={}",
            self.view,
            self.viewport.width,
            self.viewport.height,
            chart.data().len(),
            filtered.len(),
            range,
            lo,
            hi,
            trigger,
            brush,
            tooltip,
        )
    }
}
