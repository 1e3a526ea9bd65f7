use chrono::{DateTime, Utc};
use crate::models::{millis_to_datetime, TickerDataPoint};

/// Tick count used when rounding a domain to nice bounds
const NICE_TICK_COUNT: f64 = 10.0;
const NICE_MAX_ITERATIONS: usize = 10;

/// Map `t` in `[0, 1]` onto `[a, b]`
fn interpolate(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Position of `x` inside `[a, b]`; a collapsed interval maps everything to its middle
fn normalize(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span != 0.0 && !span.is_nan() {
        (x - a) / span
    } else if span.is_nan() {
        f64::NAN
    } else {
        0.5
    }
}

/// Step between ticks for roughly `count` ticks over `[start, stop]`.
/// Positive values are the step itself, negative values are the inverse of a
/// fractional step.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Continuous linear scale from values to pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Extend the domain outward to round tick multiples
    pub fn nice(mut self) -> Self {
        let (mut start, mut stop) = self.domain;
        if start == stop || !start.is_finite() || !stop.is_finite() {
            return self;
        }
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prestep = None;
        for _ in 0..NICE_MAX_ITERATIONS {
            let step = tick_increment(start, stop, NICE_TICK_COUNT);
            if prestep == Some(step) {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }

        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    pub fn map(&self, value: f64) -> f64 {
        let t = normalize(self.domain.0, self.domain.1, value);
        interpolate(self.range.0, self.range.1, t)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let t = normalize(self.range.0, self.range.1, pixel);
        interpolate(self.domain.0, self.domain.1, t)
    }
}

/// Linear scale over time, with the domain kept in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain spanning the date extent of `points`.
    /// An empty slice gives a collapsed domain at the epoch.
    pub fn from_points(points: &[TickerDataPoint], range: (f64, f64)) -> Self {
        let domain = extent(points, TickerDataPoint::timestamp_millis).unwrap_or((0.0, 0.0));
        Self::new(domain, range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Domain as UTC timestamps, for chart coordinate systems
    pub fn domain_datetimes(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((millis_to_datetime(self.domain.0)?, millis_to_datetime(self.domain.1)?))
    }

    pub fn map_millis(&self, millis: f64) -> f64 {
        let t = normalize(self.domain.0, self.domain.1, millis);
        interpolate(self.range.0, self.range.1, t)
    }

    pub fn map_point(&self, point: &TickerDataPoint) -> f64 {
        self.map_millis(point.timestamp_millis())
    }

    /// Pixel back to epoch milliseconds
    pub fn invert(&self, pixel: f64) -> f64 {
        let t = normalize(self.range.0, self.range.1, pixel);
        interpolate(self.domain.0, self.domain.1, t)
    }

    /// Same time window stretched over a different pixel range
    pub fn with_range(&self, range: (f64, f64)) -> Self {
        Self::new(self.domain, range)
    }
}

/// Min and max of `f` over `points`, skipping NaN. `None` when nothing is left.
pub fn extent<F>(points: &[TickerDataPoint], f: F) -> Option<(f64, f64)>
where
    F: Fn(&TickerDataPoint) -> f64,
{
    points
        .iter()
        .map(f)
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Close-price extent with missing bounds falling back to zero
pub fn close_extent(points: &[TickerDataPoint]) -> (f64, f64) {
    extent(points, |p| p.close).unwrap_or((0.0, 0.0))
}

/// Nice-rounded close-price scale for a chart `y_max` pixels tall
pub fn close_scale(points: &[TickerDataPoint], y_max: f64) -> LinearScale {
    LinearScale::new(close_extent(points), (y_max, 0.0)).nice()
}
