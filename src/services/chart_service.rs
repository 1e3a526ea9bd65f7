use std::ops::Range;
use std::path::Path;
use chrono::{DateTime, Duration, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;
use crate::models::{PaneRect, TickerDataPoint, Tooltip, Viewport};
use super::brush_service::{Brush, BrushChart};
use super::scale_service::{extent, LinearScale, TimeScale};

pub const BACKGROUND: RGBColor = RGBColor(0x3b, 0x69, 0x78);
pub const BACKGROUND_DARK: RGBColor = RGBColor(0x20, 0x40, 0x51);
pub const ACCENT: RGBColor = RGBColor(0xed, 0xff, 0xea);
pub const ACCENT_DARK: RGBColor = RGBColor(0x75, 0xda, 0xad);
pub const AXIS_COLOR: RGBColor = WHITE;
pub const LINE_COLOR: RGBColor = RGBColor(0x55, 0x6c, 0xd6);
pub const CANDLE_UP: RGBColor = RGBColor(0x00, 0x80, 0x00);
pub const CANDLE_DOWN: RGBColor = RED;
const HANDLE_FILL: RGBColor = RGBColor(0xf2, 0xf2, 0xf2);
const HANDLE_STROKE: RGBColor = RGBColor(0x99, 0x99, 0x99);

/// Charts narrower than this are not drawn at all
const MIN_RENDER_WIDTH: f64 = 10.0;
const LEFT_AXIS_WIDTH: f64 = 50.0;
const BOTTOM_AXIS_HEIGHT: f64 = 30.0;
const BACKGROUND_BANDS: usize = 24;
const HATCH_SPACING: f64 = 8.0;
const HANDLE_WIDTH: f64 = 8.0;
const HANDLE_HEIGHT: f64 = 15.0;
const MARKER_RADIUS: i32 = 4;
const CANDLE_WIDTH: f64 = 10.0;

/// Chart rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Viewport {0}x{1} cannot be drawn")]
    EmptyViewport(f64, f64),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn px(value: f64) -> i32 {
    value.round() as i32
}

/// Which optional parts of an area chart are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaChartProps {
    pub hide_grid: bool,
    pub hide_bottom_axis: bool,
    pub hide_left_axis: bool,
    pub hide_tooltip: bool,
}

impl AreaChartProps {
    /// Bare area used for the overview under the brush
    pub fn overview() -> Self {
        Self { hide_grid: true, hide_bottom_axis: true, hide_left_axis: true, hide_tooltip: true }
    }
}

/// Time range for the chart coordinate system; a single date is widened by a day
/// on each side so it lands in the middle like the scale maps it
fn plot_time_range(scale: &TimeScale) -> Option<Range<DateTime<Utc>>> {
    let (start, end) = scale.domain_datetimes()?;
    if start == end {
        Some(start - Duration::days(1)..end + Duration::days(1))
    } else {
        Some(start..end)
    }
}

fn plot_value_range(scale: &LinearScale) -> Range<f64> {
    let (lo, hi) = scale.domain();
    if lo == hi { lo - 1.0..hi + 1.0 } else { lo..hi }
}

fn mix_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// Banded approximation of the background gradient
fn draw_background<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
    root.fill(&BACKGROUND_DARK).map_err(draw_err)?;

    let (width, height) = root.dim_in_pixel();
    let band_height = height as f64 / BACKGROUND_BANDS as f64;
    for band in 0..BACKGROUND_BANDS {
        let t = band as f64 / (BACKGROUND_BANDS - 1) as f64;
        let color = RGBColor(
            mix_channel(BACKGROUND.0, BACKGROUND_DARK.0, t),
            mix_channel(BACKGROUND.1, BACKGROUND_DARK.1, t),
            mix_channel(BACKGROUND.2, BACKGROUND_DARK.2, t),
        );
        let top = px(band as f64 * band_height);
        let bottom = px((band + 1) as f64 * band_height);
        root.draw(&Rectangle::new([(0, top), (width as i32, bottom)], color.filled()))
            .map_err(draw_err)?;
    }

    Ok(())
}

/// Filled close-price area with optional grid, axes and tooltip
#[allow(clippy::too_many_arguments)]
pub fn draw_area_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[TickerDataPoint],
    x_scale: &TimeScale,
    y_scale: &LinearScale,
    pane: &PaneRect,
    viewport_width: f64,
    props: AreaChartProps,
    tooltip: Option<&Tooltip>,
) -> Result<(), RenderError> {
    if viewport_width < MIN_RENDER_WIDTH || pane.width <= 0.0 || pane.height <= 0.0 || points.is_empty() {
        return Ok(());
    }
    let Some(time_range) = plot_time_range(x_scale) else {
        return Ok(());
    };
    let value_range = plot_value_range(y_scale);
    let baseline = value_range.start;

    let left_label = if props.hide_left_axis { 0.0 } else { LEFT_AXIS_WIDTH };
    let bottom_label = if props.hide_bottom_axis { 0.0 } else { BOTTOM_AXIS_HEIGHT };
    let area = root.clone().shrink(
        (pane.left - left_label, pane.top),
        (pane.width + left_label, pane.height + bottom_label),
    );

    let mut chart = ChartBuilder::on(&area)
        .x_label_area_size(bottom_label)
        .y_label_area_size(left_label)
        .build_cartesian_2d(time_range, value_range)
        .map_err(draw_err)?;

    if !(props.hide_grid && props.hide_bottom_axis && props.hide_left_axis) {
        let date_label = |d: &DateTime<Utc>| d.format("%b %Y").to_string();
        let price_label = |v: &f64| format!("{:.0}", v);
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(if viewport_width > 520.0 { 10 } else { 5 })
            .y_labels(5)
            .x_label_formatter(&date_label)
            .y_label_formatter(&price_label)
            .axis_style(AXIS_COLOR)
            .label_style(("sans-serif", 10).into_font().color(&AXIS_COLOR))
            .bold_line_style(ACCENT.mix(0.2))
            .light_line_style(TRANSPARENT);
        if props.hide_grid {
            mesh.disable_mesh();
        }
        if props.hide_bottom_axis {
            mesh.disable_x_axis();
        }
        if props.hide_left_axis {
            mesh.disable_y_axis();
        }
        mesh.draw().map_err(draw_err)?;
    }

    chart
        .draw_series(
            AreaSeries::new(
                points
                    .iter()
                    .filter(|p| !p.close.is_nan())
                    .map(|p| (p.datetime(), p.close)),
                baseline,
                ACCENT.mix(0.35),
            )
            .border_style(ACCENT.mix(0.8)),
        )
        .map_err(draw_err)?;

    if let (false, Some(tooltip)) = (props.hide_tooltip, tooltip) {
        draw_tooltip(root, pane, tooltip)?;
    }

    Ok(())
}

/// Vertical guide line plus two concentric markers at the hovered point
fn draw_tooltip<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pane: &PaneRect,
    tooltip: &Tooltip,
) -> Result<(), RenderError> {
    let x = px(pane.left + tooltip.left);
    let y = px(pane.top + tooltip.top);

    root.draw(&PathElement::new(
        vec![(x, px(pane.top)), (x, px(pane.top + pane.height))],
        ACCENT_DARK.stroke_width(2),
    ))
    .map_err(draw_err)?;
    root.draw(&Circle::new(
        (x, y + 1),
        MARKER_RADIUS,
        ShapeStyle { color: BLACK.mix(0.1), filled: true, stroke_width: 2 },
    ))
    .map_err(draw_err)?;
    root.draw(&Circle::new((x, y), MARKER_RADIUS, ACCENT_DARK.filled()))
        .map_err(draw_err)?;
    root.draw(&Circle::new((x, y), MARKER_RADIUS, WHITE.stroke_width(2)))
        .map_err(draw_err)?;

    Ok(())
}

/// Diagonal hatch segments (bottom-left to top-right) clipped to a rectangle
pub fn hatch_lines(x0: f64, x1: f64, y0: f64, y1: f64, spacing: f64) -> Vec<((f64, f64), (f64, f64))> {
    let mut lines = Vec::new();
    if x1 <= x0 || y1 <= y0 || spacing <= 0.0 {
        return lines;
    }

    // every segment lies on x + y = c
    let mut c = x0 + y0 + spacing;
    while c < x1 + y1 {
        let lo = x0.max(c - y1);
        let hi = x1.min(c - y0);
        if lo < hi {
            lines.push(((lo, c - lo), (hi, c - hi)));
        }
        c += spacing;
    }
    lines
}

/// Selected region and drag handles of the brush
fn draw_brush_selection<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pane: &PaneRect,
    brush: &Brush,
) -> Result<(), RenderError> {
    let Some(extent) = brush.extent() else {
        return Ok(());
    };
    let (x0, x1) = (pane.left + extent.x0, pane.left + extent.x1);
    let (y0, y1) = (pane.top, pane.top + brush.height());

    for ((ax, ay), (bx, by)) in hatch_lines(x0, x1, y0, y1, HATCH_SPACING) {
        root.draw(&PathElement::new(vec![(px(ax), px(ay)), (px(bx), px(by))], ACCENT.stroke_width(1)))
            .map_err(draw_err)?;
    }
    root.draw(&Rectangle::new([(px(x0), px(y0)), (px(x1), px(y1))], WHITE.stroke_width(1)))
        .map_err(draw_err)?;

    let handle_top = y0 + (brush.height() - HANDLE_HEIGHT) / 2.0;
    for edge in [x0, x1] {
        let corners = [
            (px(edge - HANDLE_WIDTH / 2.0), px(handle_top)),
            (px(edge + HANDLE_WIDTH / 2.0), px(handle_top + HANDLE_HEIGHT)),
        ];
        root.draw(&Rectangle::new(corners, HANDLE_FILL.filled())).map_err(draw_err)?;
        root.draw(&Rectangle::new(corners, HANDLE_STROKE.stroke_width(1))).map_err(draw_err)?;
        for grip in [-1.0, 1.0] {
            root.draw(&PathElement::new(
                vec![
                    (px(edge + grip), px(handle_top + 4.0)),
                    (px(edge + grip), px(handle_top + HANDLE_HEIGHT - 3.0)),
                ],
                HANDLE_STROKE.stroke_width(1),
            ))
            .map_err(draw_err)?;
        }
    }

    Ok(())
}

/// Detail chart on top, overview with the brush underneath
pub fn draw_brush_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &BrushChart,
) -> Result<(), RenderError> {
    draw_brush_chart_with(root, chart, AreaChartProps::default())
}

/// Composite paint with explicit options for the detail pane
pub fn draw_brush_chart_with<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &BrushChart,
    detail_props: AreaChartProps,
) -> Result<(), RenderError> {
    draw_background(root)?;

    // nothing but the background until the detail scale exists
    let Some(stock_scale) = chart.stock_scale() else {
        return Ok(());
    };
    let layout = chart.layout();
    let width = layout.viewport.width;

    draw_area_chart(
        root,
        chart.filtered(),
        chart.date_scale(),
        stock_scale,
        &layout.detail,
        width,
        detail_props,
        chart.tooltip(),
    )?;
    draw_area_chart(
        root,
        chart.data(),
        chart.brush_date_scale(),
        chart.brush_stock_scale(),
        &layout.overview,
        width,
        AreaChartProps::overview(),
        None,
    )?;
    if width >= MIN_RENDER_WIDTH {
        draw_brush_selection(root, &layout.overview, chart.brush())?;
    }

    Ok(())
}

/// Own y-scale over the closes, mapped onto `[height, 0]`
pub fn line_geometry(points: &[TickerDataPoint], x_scale: &TimeScale, height: f64) -> Vec<(f64, f64)> {
    let y_scale = LinearScale::new(extent(points, |p| p.close).unwrap_or((0.0, 0.0)), (height, 0.0));
    points
        .iter()
        .map(|p| (x_scale.map_point(p), y_scale.map(p.close)))
        .collect()
}

pub fn draw_line_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[TickerDataPoint],
    x_scale: &TimeScale,
    height: f64,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(draw_err)?;
    let path: Vec<(i32, i32)> = line_geometry(points, x_scale, height)
        .into_iter()
        .map(|(x, y)| (px(x), px(y)))
        .collect();
    root.draw(&PathElement::new(path, LINE_COLOR.stroke_width(2)))
        .map_err(draw_err)?;
    Ok(())
}

/// One OHLC bar in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleShape {
    pub x: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub bearish: bool,
}

/// Own y-scale over every price of every bar, mapped onto `[height, 0]`
pub fn candle_geometry(points: &[TickerDataPoint], x_scale: &TimeScale, height: f64) -> Vec<CandleShape> {
    let lows = extent(points, |p| p.low.min(p.open).min(p.close).min(p.high));
    let highs = extent(points, |p| p.low.max(p.open).max(p.close).max(p.high));
    let domain = match (lows, highs) {
        (Some((lo, _)), Some((_, hi))) => (lo, hi),
        _ => (0.0, 0.0),
    };
    let y_scale = LinearScale::new(domain, (height, 0.0));

    points
        .iter()
        .map(|p| CandleShape {
            x: x_scale.map_point(p),
            body_top: y_scale.map(p.open.max(p.close)),
            body_height: (y_scale.map(p.open) - y_scale.map(p.close)).abs(),
            wick_top: y_scale.map(p.high),
            wick_bottom: y_scale.map(p.low),
            bearish: p.open > p.close,
        })
        .collect()
}

pub fn draw_candlestick_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[TickerDataPoint],
    x_scale: &TimeScale,
    height: f64,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(draw_err)?;
    for candle in candle_geometry(points, x_scale, height) {
        let color = if candle.bearish { CANDLE_DOWN } else { CANDLE_UP };
        root.draw(&Rectangle::new(
            [
                (px(candle.x - CANDLE_WIDTH / 2.0), px(candle.body_top)),
                (px(candle.x + CANDLE_WIDTH / 2.0), px(candle.body_top + candle.body_height)),
            ],
            color.filled(),
        ))
        .map_err(draw_err)?;
        root.draw(&PathElement::new(
            vec![(px(candle.x), px(candle.wick_top)), (px(candle.x), px(candle.wick_bottom))],
            BLACK.stroke_width(1),
        ))
        .map_err(draw_err)?;
    }
    Ok(())
}

/// Something that can be painted onto a drawing surface
pub enum Scene<'a> {
    Brush(&'a BrushChart),
    Line { points: &'a [TickerDataPoint], viewport: Viewport },
    Candlestick { points: &'a [TickerDataPoint], viewport: Viewport },
}

impl Scene<'_> {
    pub fn viewport(&self) -> Viewport {
        match self {
            Scene::Brush(chart) => chart.layout().viewport,
            Scene::Line { viewport, .. } | Scene::Candlestick { viewport, .. } => *viewport,
        }
    }

    pub fn paint<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        match self {
            Scene::Brush(chart) => draw_brush_chart(root, chart),
            Scene::Line { points, viewport } => {
                let x_scale = TimeScale::from_points(points, (0.0, viewport.width));
                draw_line_chart(root, points, &x_scale, viewport.height)
            }
            Scene::Candlestick { points, viewport } => {
                let x_scale = TimeScale::from_points(points, (0.0, viewport.width));
                draw_candlestick_chart(root, points, &x_scale, viewport.height)
            }
        }
    }

    fn pixel_size(&self) -> Result<(u32, u32), RenderError> {
        let Viewport { width, height } = self.viewport();
        if !self.viewport().is_drawable() {
            return Err(RenderError::EmptyViewport(width, height));
        }
        Ok((width.round() as u32, height.round() as u32))
    }
}

/// Paint a scene into a file: `.svg` as vector output, anything else as a bitmap
pub fn render_to_file(scene: &Scene<'_>, path: &Path) -> Result<(), RenderError> {
    let size = scene.pixel_size()?;
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        scene.paint(&root)?;
        root.present().map_err(draw_err)?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        scene.paint(&root)?;
        root.present().map_err(draw_err)?;
    }

    tracing::info!("🖼️ Rendered {}x{} chart to {}", size.0, size.1, path.display());
    Ok(())
}

/// Paint a scene into an in-memory SVG document
pub fn render_to_svg_string(scene: &Scene<'_>) -> Result<String, RenderError> {
    let size = scene.pixel_size()?;
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
        scene.paint(&root)?;
        root.present().map_err(draw_err)?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, open: f64, high: f64, low: f64, close: f64) -> TickerDataPoint {
        TickerDataPoint {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            open,
            high,
            low,
            close,
            adj_close: close,
            volume: 0.0,
        }
    }

    fn bars() -> Vec<TickerDataPoint> {
        vec![
            bar(1, 10.0, 14.0, 8.0, 12.0),
            bar(2, 12.0, 13.0, 6.0, 7.0),
            bar(3, 7.0, 18.0, 7.0, 16.0),
        ]
    }

    #[test]
    fn test_candle_geometry_uses_full_price_range() {
        let points = bars();
        let x_scale = TimeScale::from_points(&points, (0.0, 200.0));
        let candles = candle_geometry(&points, &x_scale, 120.0);

        // domain is [6, 18] over 120 px, 10 px per unit
        assert_eq!(candles[0].x, 0.0);
        assert_eq!(candles[0].body_top, 60.0);
        assert_eq!(candles[0].body_height, 20.0);
        assert_eq!(candles[0].wick_top, 40.0);
        assert_eq!(candles[0].wick_bottom, 100.0);
        assert!(!candles[0].bearish);

        assert!(candles[1].bearish);
        assert_eq!(candles[1].wick_bottom, 120.0);
        assert_eq!(candles[2].wick_top, 0.0);
        assert_eq!(candles[2].x, 200.0);
    }

    #[test]
    fn test_line_geometry_spans_close_extent() {
        let points = bars();
        let x_scale = TimeScale::from_points(&points, (0.0, 100.0));
        let path = line_geometry(&points, &x_scale, 90.0);

        assert_eq!(path, vec![(0.0, 40.0), (50.0, 90.0), (100.0, 0.0)]);
    }

    #[test]
    fn test_hatch_lines_stay_inside_rectangle() {
        let lines = hatch_lines(10.0, 30.0, 0.0, 16.0, 8.0);
        assert!(!lines.is_empty());
        for ((ax, ay), (bx, by)) in &lines {
            for (x, y) in [(ax, ay), (bx, by)] {
                assert!(*x >= 10.0 && *x <= 30.0);
                assert!(*y >= 0.0 && *y <= 16.0);
            }
            assert!((ax + ay - (bx + by)).abs() < 1e-9);
        }
        assert!(hatch_lines(10.0, 10.0, 0.0, 16.0, 8.0).is_empty());
    }

    #[test]
    fn test_candlestick_svg_colors_bars() {
        let points = bars();
        let scene = Scene::Candlestick { points: &points, viewport: Viewport { width: 320.0, height: 200.0 } };
        let svg = render_to_svg_string(&scene).unwrap();

        assert!(svg.contains("width=\"320\""));
        assert!(svg.contains("#FF0000"));
        assert!(svg.contains("#008000"));
    }

    #[test]
    fn test_line_svg_draws_path() {
        let points = bars();
        let scene = Scene::Line { points: &points, viewport: Viewport { width: 640.0, height: 480.0 } };
        let svg = render_to_svg_string(&scene).unwrap();

        assert!(svg.contains("width=\"640\""));
        assert!(svg.contains("height=\"480\""));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("#556CD6"));
    }

    /// Grid and tooltip on, both axes off, so nothing needs a font
    const GRID_AND_TOOLTIP: AreaChartProps =
        AreaChartProps { hide_grid: false, hide_bottom_axis: true, hide_left_axis: true, hide_tooltip: false };

    #[test]
    fn test_tooltip_draws_guide_and_markers() {
        let points = bars();
        let pane = PaneRect { left: 10.0, top: 10.0, width: 180.0, height: 80.0 };
        let x_scale = TimeScale::from_points(&points, (0.0, pane.width));
        let y_scale = LinearScale::new((0.0, 20.0), (pane.height, 0.0));
        let tooltip = Tooltip { point: points[1], left: 90.0, top: 52.0 };
        let props = AreaChartProps { hide_tooltip: false, ..AreaChartProps::overview() };

        let mut with_tooltip = String::new();
        {
            let root = SVGBackend::with_string(&mut with_tooltip, (200, 100)).into_drawing_area();
            draw_area_chart(&root, &points, &x_scale, &y_scale, &pane, 200.0, props, Some(&tooltip)).unwrap();
            root.present().unwrap();
        }
        let mut hidden = String::new();
        {
            let root = SVGBackend::with_string(&mut hidden, (200, 100)).into_drawing_area();
            draw_area_chart(&root, &points, &x_scale, &y_scale, &pane, 200.0, AreaChartProps::overview(), Some(&tooltip))
                .unwrap();
            root.present().unwrap();
        }

        assert!(with_tooltip.contains("#75DAAD"));
        assert!(with_tooltip.matches("<circle").count() >= 3);
        assert!(with_tooltip.matches("<polyline").count() > hidden.matches("<polyline").count());
        assert!(!hidden.contains("#75DAAD"));
        assert!(!hidden.contains("<circle"));
    }

    #[test]
    fn test_grid_without_axes_draws_lines_only() {
        let points = bars();
        let pane = PaneRect { left: 10.0, top: 10.0, width: 180.0, height: 80.0 };
        let x_scale = TimeScale::from_points(&points, (0.0, pane.width));
        let y_scale = LinearScale::new((0.0, 20.0), (pane.height, 0.0));

        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (200, 100)).into_drawing_area();
            draw_area_chart(&root, &points, &x_scale, &y_scale, &pane, 200.0, GRID_AND_TOOLTIP, None).unwrap();
            root.present().unwrap();
        }

        assert!(buffer.contains("<line"));
        assert!(buffer.contains("<polygon"));
        assert!(!buffer.contains("<text"));
    }

    #[test]
    fn test_composite_paints_brush_selection() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let data: Vec<TickerDataPoint> = (0..60)
            .map(|i| {
                let close = 50.0 + (i % 7) as f64;
                TickerDataPoint {
                    date: start + Duration::days(i),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    adj_close: close,
                    volume: 0.0,
                }
            })
            .collect();
        let viewport = Viewport { width: 400.0, height: 300.0 };
        let mut chart = BrushChart::new(data, viewport, 365, std::time::Duration::from_millis(150));
        let detail = chart.layout().detail;
        chart.pointer_move(detail.left + 100.0, detail.top + 10.0, tokio::time::Instant::now());
        assert!(chart.tooltip().is_some());

        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (400, 300)).into_drawing_area();
            draw_brush_chart_with(&root, &chart, GRID_AND_TOOLTIP).unwrap();
            root.present().unwrap();
        }

        // background bands
        assert!(buffer.contains("#204051"));
        // detail grid and both area panes
        assert!(buffer.contains("<line"));
        assert!(buffer.matches("<polygon").count() >= 2);
        // tooltip markers
        assert!(buffer.contains("#75DAAD"));
        // hatch segments across the whole selection
        let hatch = hatch_lines(50.0, 380.0, 228.0, 265.0, 8.0).len();
        assert!(buffer.matches("<polyline").count() >= hatch);
        // brush handles: filled body plus outline
        assert!(buffer.contains("#F2F2F2"));
        assert!(buffer.contains("#999999"));
        assert!(!buffer.contains("<text"));
    }

    #[test]
    fn test_overview_area_renders_without_axes() {
        let points = bars();
        let pane = PaneRect { left: 10.0, top: 10.0, width: 180.0, height: 80.0 };
        let x_scale = TimeScale::from_points(&points, (0.0, pane.width));
        let y_scale = LinearScale::new((0.0, 20.0), (pane.height, 0.0));

        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (200, 100)).into_drawing_area();
            draw_area_chart(&root, &points, &x_scale, &y_scale, &pane, 200.0, AreaChartProps::overview(), None)
                .unwrap();
            root.present().unwrap();
        }

        assert!(buffer.contains("<polygon"));
        assert!(!buffer.contains("<text"));
    }

    #[test]
    fn test_narrow_viewport_draws_nothing() {
        let points = bars();
        let pane = PaneRect { left: 0.0, top: 0.0, width: 8.0, height: 80.0 };
        let x_scale = TimeScale::from_points(&points, (0.0, pane.width));
        let y_scale = LinearScale::new((0.0, 20.0), (pane.height, 0.0));

        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (8, 100)).into_drawing_area();
            draw_area_chart(&root, &points, &x_scale, &y_scale, &pane, 8.0, AreaChartProps::overview(), None)
                .unwrap();
            root.present().unwrap();
        }

        assert!(!buffer.contains("<polygon"));
    }

    #[test]
    fn test_zero_viewport_is_rejected() {
        let points = bars();
        let scene = Scene::Line { points: &points, viewport: Viewport { width: 0.0, height: 100.0 } };
        assert!(matches!(render_to_svg_string(&scene), Err(RenderError::EmptyViewport(..))));

        let scene = Scene::Line { points: &points, viewport: Viewport { width: f64::INFINITY, height: 100.0 } };
        assert!(matches!(render_to_svg_string(&scene), Err(RenderError::EmptyViewport(..))));
    }
}
