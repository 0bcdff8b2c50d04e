use crate::traits::DataError;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Market Data
// ---------------------------------------------------------------------------

/// A single OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

// ---------------------------------------------------------------------------
// Price Series
// ---------------------------------------------------------------------------

/// Closing prices of one symbol, ordered most-recent-first (index 0 is the
/// latest close). This is the layout every indicator expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    /// Timestamp of `closes[0]`, if the series came from bars.
    pub as_of: Option<DateTime<Utc>>,
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Build a series from closes that are already most-recent-first.
    pub fn new(symbol: impl Into<String>, closes: Vec<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            as_of: None,
            closes,
        }
    }

    /// Build a series from bars in any order. Bars are ordered by timestamp
    /// and the closes reversed so the latest comes first.
    pub fn from_bars(symbol: impl Into<String>, bars: &[Bar]) -> Result<Self, DataError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(DataError::Empty(symbol));
        }

        let mut ordered: Vec<&Bar> = bars.iter().collect();
        ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let closes = ordered
            .iter()
            .map(|bar| {
                bar.close.to_f64().ok_or_else(|| {
                    DataError::Conversion(format!("close {} at {}", bar.close, bar.timestamp))
                })
            })
            .collect::<Result<Vec<f64>, DataError>>()?;

        Ok(Self {
            symbol,
            as_of: ordered.first().map(|bar| bar.timestamp),
            closes,
        })
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn latest(&self) -> Option<f64> {
        self.closes.first().copied()
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn bar(day: u32, close: Decimal) -> Bar {
        Bar {
            symbol: "SPY".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ZERO,
        }
    }

    #[test]
    fn test_from_bars_orders_latest_first() {
        let bars = vec![
            bar(2, dec!(101.5)),
            bar(4, dec!(103)),
            bar(1, dec!(100)),
            bar(3, dec!(102.25)),
        ];
        let series = PriceSeries::from_bars("SPY", &bars).unwrap();
        assert_eq!(series.closes(), &[103.0, 102.25, 101.5, 100.0]);
        assert_eq!(series.latest(), Some(103.0));
        assert_eq!(series.as_of, Some(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()));
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn test_from_bars_empty() {
        let err = PriceSeries::from_bars("SPY", &[]).unwrap_err();
        assert!(matches!(err, DataError::Empty(s) if s == "SPY"));
    }

    #[test]
    fn test_new_keeps_order() {
        let series = PriceSeries::new("X", vec![3.0, 2.0]);
        assert_eq!(series.latest(), Some(3.0));
        assert!(series.as_of.is_none());
        assert!(!series.is_empty());
    }
}
