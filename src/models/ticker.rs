//! Ticker data models

use chrono::{DateTime, NaiveDate, Utc};

/// One row of the daily price file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerDataPoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

impl TickerDataPoint {
    /// Midnight UTC of the row's calendar date
    pub fn datetime(&self) -> DateTime<Utc> {
        self.date
            .and_hms_opt(0, 0, 0)
            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
            .unwrap_or_default()
    }

    /// Epoch milliseconds of the row's date, the unit every time scale works in
    pub fn timestamp_millis(&self) -> f64 {
        self.datetime().timestamp_millis() as f64
    }
}

/// Convert epoch milliseconds back into a UTC timestamp
pub fn millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str) -> TickerDataPoint {
        TickerDataPoint {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            adj_close: 1.5,
            volume: 100.0,
        }
    }

    #[test]
    fn test_timestamp_is_utc_midnight() {
        let p = point("1970-01-02");
        assert_eq!(p.timestamp_millis(), 86_400_000.0);
    }

    #[test]
    fn test_millis_round_trip_through_datetime() {
        let p = point("2023-03-15");
        let dt = millis_to_datetime(p.timestamp_millis()).unwrap();
        assert_eq!(dt.date_naive(), p.date);
        assert!(millis_to_datetime(f64::NAN).is_none());
    }
}
