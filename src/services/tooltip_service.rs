use crate::models::{PaneRect, TickerDataPoint, Tooltip};
use super::scale_service::{LinearScale, TimeScale};

/// Index of the first point whose date is not before `millis`, searching from `lo`
pub fn bisect_date(points: &[TickerDataPoint], millis: f64, lo: usize) -> usize {
    let lo = lo.min(points.len());
    lo + points[lo..].partition_point(|p| p.timestamp_millis() < millis)
}

/// The point nearest to `millis` in date, ties going to the later point
pub fn nearest_point(points: &[TickerDataPoint], millis: f64) -> Option<&TickerDataPoint> {
    if points.is_empty() {
        return None;
    }

    let index = bisect_date(points, millis, 1);
    let before = &points[index - 1];
    match points.get(index) {
        Some(after) => {
            let to_before = (millis - before.timestamp_millis()).abs();
            let to_after = (after.timestamp_millis() - millis).abs();
            if to_before >= to_after { Some(after) } else { Some(before) }
        }
        None => Some(before),
    }
}

/// Pointer-driven tooltip owned by one area chart pane
#[derive(Debug, Clone, Default)]
pub struct TooltipTracker {
    current: Option<Tooltip>,
}

impl TooltipTracker {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<&Tooltip> {
        self.current.as_ref()
    }

    /// Handle a pointer or touch move at viewport coordinates
    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        pane: &PaneRect,
        points: &[TickerDataPoint],
        x_scale: &TimeScale,
        y_scale: &LinearScale,
    ) {
        let Some((local_x, _)) = pane.to_local(x, y) else {
            self.hide();
            return;
        };

        let x0 = x_scale.invert(local_x);
        self.current = nearest_point(points, x0).map(|point| Tooltip {
            point: *point,
            left: x_scale.map_point(point),
            top: y_scale.map(point.close),
        });
    }

    pub fn hide(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, close: f64) -> TickerDataPoint {
        TickerDataPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 0.0,
        }
    }

    const DAY: f64 = 86_400_000.0;

    #[test]
    fn test_nearest_picks_closer_neighbour() {
        let points = vec![point(1, 1.0), point(3, 3.0), point(7, 7.0)];
        let base = points[0].timestamp_millis();

        assert_eq!(nearest_point(&points, base + 0.9 * DAY).unwrap().close, 1.0);
        assert_eq!(nearest_point(&points, base + 1.1 * DAY).unwrap().close, 3.0);
        assert_eq!(nearest_point(&points, base + 3.5 * DAY).unwrap().close, 3.0);
        assert_eq!(nearest_point(&points, base + 5.5 * DAY).unwrap().close, 7.0);
    }

    #[test]
    fn test_tie_goes_to_later_point() {
        let points = vec![point(1, 1.0), point(3, 3.0)];
        let midpoint = points[0].timestamp_millis() + DAY;
        assert_eq!(nearest_point(&points, midpoint).unwrap().close, 3.0);
    }

    #[test]
    fn test_edges_and_degenerate_inputs() {
        let points = vec![point(5, 5.0), point(6, 6.0)];
        assert_eq!(nearest_point(&points, 0.0).unwrap().close, 5.0);
        assert_eq!(nearest_point(&points, f64::MAX).unwrap().close, 6.0);

        let single = vec![point(5, 5.0)];
        assert_eq!(nearest_point(&single, 0.0).unwrap().close, 5.0);
        assert!(nearest_point(&[], 0.0).is_none());
    }

    #[test]
    fn test_tracker_shows_and_hides() {
        let points = vec![point(1, 10.0), point(11, 20.0)];
        let pane = PaneRect { left: 50.0, top: 20.0, width: 100.0, height: 200.0 };
        let x_scale = TimeScale::from_points(&points, (0.0, 100.0));
        let y_scale = LinearScale::new((0.0, 20.0), (200.0, 0.0));
        let mut tracker = TooltipTracker::new();

        tracker.pointer_move(140.0, 100.0, &pane, &points, &x_scale, &y_scale);
        let tooltip = tracker.current().unwrap();
        assert_eq!(tooltip.point.close, 20.0);
        assert_eq!(tooltip.left, 100.0);
        assert_eq!(tooltip.top, 0.0);

        tracker.pointer_move(60.0, 100.0, &pane, &points, &x_scale, &y_scale);
        assert_eq!(tracker.current().unwrap().point.close, 10.0);
        assert_eq!(tracker.current().unwrap().top, 100.0);

        // outside the overlay counts as leaving it
        tracker.pointer_move(10.0, 100.0, &pane, &points, &x_scale, &y_scale);
        assert!(tracker.current().is_none());

        tracker.pointer_move(60.0, 100.0, &pane, &points, &x_scale, &y_scale);
        tracker.hide();
        assert!(tracker.current().is_none());
    }
}
