use std::path::PathBuf;
use std::time::Duration;
use crate::models::{Viewport, MAX_VIEWPORT_SIDE};
use crate::services::brush_service::{BRUSH_DEBOUNCE, INITIAL_VISIBLE_DATA_LENGTH};
use crate::services::data_service::DEFAULT_DATA_SOURCE;

pub const DEFAULT_WIDTH: f64 = 1280.0;
pub const DEFAULT_HEIGHT: f64 = 720.0;
pub const DEFAULT_OUTPUT: &str = "chart.svg";
pub const DEFAULT_LOG_FILTER: &str = "ticker_charts=debug";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_source: String,
    pub viewport: Viewport,
    pub output: PathBuf,
    pub debounce: Duration,
    pub initial_visible: usize,
    pub auto_render: bool,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());

        Self {
            data_source: lookup("DATA_SOURCE").unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string()),
            viewport: Viewport {
                width: parsed("CHART_WIDTH").unwrap_or(DEFAULT_WIDTH),
                height: parsed("CHART_HEIGHT").unwrap_or(DEFAULT_HEIGHT),
            },
            output: lookup("CHART_OUTPUT")
                .unwrap_or_else(|| DEFAULT_OUTPUT.to_string())
                .into(),
            debounce: lookup("BRUSH_DEBOUNCE_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(BRUSH_DEBOUNCE),
            initial_visible: lookup("INITIAL_VISIBLE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(INITIAL_VISIBLE_DATA_LENGTH),
            auto_render: lookup("AUTO_RENDER")
                .unwrap_or_else(|| "false".to_string())
                .trim()
                .parse()
                .unwrap_or(false),
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.viewport.is_drawable() {
            return Err(format!(
                "CHART_WIDTH and CHART_HEIGHT must be between 1 and {}, got {}x{}",
                MAX_VIEWPORT_SIDE, self.viewport.width, self.viewport.height
            ));
        }
        if self.initial_visible == 0 {
            return Err("INITIAL_VISIBLE must be at least 1".to_string());
        }
        if self.output.as_os_str().is_empty() {
            return Err("CHART_OUTPUT must not be empty".to_string());
        }
        if self.data_source.trim().is_empty() {
            return Err("DATA_SOURCE must not be empty".to_string());
        }
        Ok(())
    }
}
