use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, info, warn};
use crate::models::TickerDataPoint;

pub const DEFAULT_DATA_SOURCE: &str = "data/QQQ.csv";

/// Date layouts accepted in the `Date` column
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Data loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Raw CSV row, every field kept as text so coercion stays under our control
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date", default, deserialize_with = "present_field")]
    date: Option<String>,
    #[serde(rename = "Open", default, deserialize_with = "present_field")]
    open: Option<String>,
    #[serde(rename = "High", default, deserialize_with = "present_field")]
    high: Option<String>,
    #[serde(rename = "Low", default, deserialize_with = "present_field")]
    low: Option<String>,
    #[serde(rename = "Close", default, deserialize_with = "present_field")]
    close: Option<String>,
    #[serde(rename = "Adj Close", default, deserialize_with = "present_field")]
    adj_close: Option<String>,
    #[serde(rename = "Volume", default, deserialize_with = "present_field")]
    volume: Option<String>,
}

/// A column that exists in the header is always `Some`, even when the cell is empty.
/// Only columns missing from the file fall back to `None`.
fn present_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    String::deserialize(deserializer).map(Some)
}

/// Coerce a CSV field to a number the way unary plus does in a browser:
/// whitespace is ignored, empty is 0, anything unparseable is NaN
pub fn coerce_number(field: Option<&str>) -> f64 {
    match field.map(str::trim) {
        None => f64::NAN,
        Some("") => 0.0,
        Some(text) => text.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Parse a calendar date in ISO or US layout
pub fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(field, fmt).ok())
}

fn parse_row(raw: &RawRow) -> Option<TickerDataPoint> {
    let date = parse_date(raw.date.as_deref()?)?;

    Some(TickerDataPoint {
        date,
        open: coerce_number(raw.open.as_deref()),
        high: coerce_number(raw.high.as_deref()),
        low: coerce_number(raw.low.as_deref()),
        close: coerce_number(raw.close.as_deref()),
        adj_close: coerce_number(raw.adj_close.as_deref()),
        volume: coerce_number(raw.volume.as_deref()),
    })
}

/// Parse the whole CSV body into ticker rows, in file order
pub fn parse_csv(text: &str) -> Result<Vec<TickerDataPoint>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut points = Vec::new();
    for (line, record) in reader.deserialize::<RawRow>().enumerate() {
        let raw = record?;
        match parse_row(&raw) {
            Some(point) => points.push(point),
            None => warn!("Skipping row {}: unparseable date {:?}", line + 1, raw.date),
        }
    }

    Ok(points)
}

/// Fetch the CSV body from a local path or an http(s) URL
pub async fn fetch_csv(source: &str) -> Result<String, LoadError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        debug!("Fetching CSV over HTTP: {}", source);
        let response = reqwest::get(source).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    } else {
        debug!("Reading CSV from disk: {}", source);
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| LoadError::Io { path: source.to_string(), source: e })
    }
}

/// Load and parse the ticker file
pub async fn load_ticker_data(source: &str) -> Result<Vec<TickerDataPoint>, LoadError> {
    info!("📥 Loading ticker data from {}", source);
    let body = fetch_csv(source).await?;
    let points = parse_csv(&body)?;
    info!("✓ Loaded {} ticker rows", points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Open,High,Low,Close,Adj Close,Volume";

    #[test]
    fn test_parse_well_formed_row() {
        let body = format!("{}\n2023-01-03,268.65,270.0,262.5,265.06,263.8,42335300\n", HEADER);
        let points = parse_csv(&body).unwrap();

        assert_eq!(points.len(), 1);
        let p = points[0];
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
        assert_eq!(p.open, 268.65);
        assert_eq!(p.high, 270.0);
        assert_eq!(p.low, 262.5);
        assert_eq!(p.close, 265.06);
        assert_eq!(p.adj_close, 263.8);
        assert_eq!(p.volume, 42335300.0);
    }

    #[test]
    fn test_us_dates_and_row_order_kept() {
        let body = format!("{}\n01/04/2023,1,1,1,2,2,10\n1/3/2023,1,1,1,3,3,10\n", HEADER);
        let points = parse_csv(&body).unwrap();

        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2023, 1, 4).unwrap());
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
        assert_eq!(points[1].close, 3.0);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(coerce_number(Some(" 12.5 ")), 12.5);
        assert_eq!(coerce_number(Some("")), 0.0);
        assert!(coerce_number(Some("n/a")).is_nan());
        assert!(coerce_number(None).is_nan());
    }

    #[test]
    fn test_malformed_fields_propagate_as_nan() {
        let body = format!("{}\n2023-01-03,abc,,1,2,x,7\n", HEADER);
        let points = parse_csv(&body).unwrap();

        assert_eq!(points.len(), 1);
        assert!(points[0].open.is_nan());
        assert_eq!(points[0].high, 0.0);
        assert_eq!(points[0].close, 2.0);
        assert!(points[0].adj_close.is_nan());
        assert_eq!(points[0].volume, 7.0);
    }

    #[test]
    fn test_missing_column_is_nan() {
        let body = "Date,Open,High,Low,Close,Volume\n2023-01-03,1,2,0.5,1.5,9\n";
        let points = parse_csv(body).unwrap();

        assert_eq!(points[0].close, 1.5);
        assert!(points[0].adj_close.is_nan());
        assert_eq!(points[0].volume, 9.0);
    }

    #[test]
    fn test_unparseable_dates_are_skipped() {
        let body = format!("{}\nyesterday,1,1,1,1,1,1\n2023-01-05,1,1,1,1,1,1\n", HEADER);
        let points = parse_csv(&body).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("ticker_charts_load_{}.csv", std::process::id()));
        std::fs::write(&path, format!("{}\n2023-01-03,1,2,0.5,1.5,1.5,100\n", HEADER)).unwrap();

        let points = load_ticker_data(path.to_str().unwrap()).await.unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 1.5);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = load_ticker_data("/nonexistent/ticker_charts/QQQ.csv").await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
