use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pricemath_core::{Bar, DataError};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Load OHLCV bars from a CSV file. The symbol is taken from the file stem.
///
/// See [`load_bars_from_reader`] for the accepted layout.
pub fn load_bars_from_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let symbol = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let file = std::fs::File::open(path)?;
    let bars = load_bars_from_reader(file, &symbol)?;
    tracing::info!(path = %path.display(), symbol = %symbol, bars = bars.len(), "Loaded CSV bars");
    Ok(bars)
}

/// Load OHLCV bars from any CSV source, sorted oldest first.
///
/// Expected columns (case-insensitive, flexible ordering):
/// `timestamp` (or `date`, `datetime`, `time`) and `close` (or `c`).
/// An adjusted close column (`adj close`, `adj_close`, `adjusted_close`)
/// takes precedence over `close`. `open`, `high`, `low` default to the close
/// and `volume` to zero when absent.
pub fn load_bars_from_reader<R: Read>(reader: R, symbol: &str) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(format!("Failed to read headers: {}", e)))?
        .clone();

    let col_map = resolve_bar_columns(&headers)?;

    let mut bars = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::ParseError(format!("CSV record error: {}", e)))?;
        let row = line + 1;

        let timestamp = parse_timestamp(get_field(&record, col_map.timestamp, row)?)?;
        let close = parse_decimal(get_field(&record, col_map.close, row)?, "close")?;
        let open = parse_optional(&record, col_map.open, row, "open", close)?;
        let high = parse_optional(&record, col_map.high, row, "high", close)?;
        let low = parse_optional(&record, col_map.low, row, "low", close)?;
        let volume = parse_optional(&record, col_map.volume, row, "volume", Decimal::ZERO)?;

        bars.push(Bar {
            symbol: symbol.to_string(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    tracing::debug!(symbol, bars = bars.len(), "Parsed CSV bars");
    Ok(bars)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct BarColumnMap {
    timestamp: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

fn resolve_bar_columns(headers: &csv::StringRecord) -> Result<BarColumnMap, DataError> {
    let ts = find_column(headers, &["timestamp", "date", "datetime", "time"])
        .ok_or_else(|| DataError::ParseError("No timestamp column found".into()))?;
    let close = find_column(headers, &["adj close", "adj_close", "adjusted_close"])
        .or_else(|| find_column(headers, &["close", "c"]))
        .ok_or_else(|| DataError::ParseError("No close column found".into()))?;

    Ok(BarColumnMap {
        timestamp: ts,
        close,
        open: find_column(headers, &["open", "o"]),
        high: find_column(headers, &["high", "h"]),
        low: find_column(headers, &["low", "l"]),
        volume: find_column(headers, &["volume", "vol", "v"]),
    })
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let h = header.trim().to_lowercase();
        names.iter().any(|name| h == *name)
    })
}

fn get_field(record: &csv::StringRecord, idx: usize, row: usize) -> Result<&str, DataError> {
    record
        .get(idx)
        .ok_or_else(|| DataError::ParseError(format!("Row {} is missing column {}", row, idx)))
}

fn parse_optional(
    record: &csv::StringRecord,
    idx: Option<usize>,
    row: usize,
    field: &str,
    default: Decimal,
) -> Result<Decimal, DataError> {
    match idx {
        Some(i) => parse_decimal(get_field(record, i, row)?, field),
        None => Ok(default),
    }
}

fn parse_decimal(s: &str, field: &str) -> Result<Decimal, DataError> {
    Decimal::from_str(s.trim())
        .or_else(|_| Decimal::from_scientific(s.trim()))
        .map_err(|e| DataError::ParseError(format!("Failed to parse {} '{}': {}", field, s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DataError> {
    let s = s.trim();

    // RFC 3339 / ISO 8601 with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Common formats without timezone, assumed UTC
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in &datetime_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    for fmt in &["%Y-%m-%d", "%m/%d/%Y"] {
        if let Some(midnight) = NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(midnight.and_utc());
        }
    }

    // Unix timestamp (seconds)
    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt);
        }
    }

    Err(DataError::ParseError(format!(
        "Unable to parse timestamp: '{}'",
        s
    )))
}
