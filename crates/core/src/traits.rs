use crate::models::*;

// ---------------------------------------------------------------------------
// Price Source Trait
// ---------------------------------------------------------------------------

/// Errors that can occur while loading price data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Data not found: {0}")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Price not representable as f64: {0}")]
    Conversion(String),
    #[error("No bars for {0}")]
    Empty(String),
}

/// Supplies historical bars for a symbol.
pub trait PriceSource: Send + Sync {
    /// Load every available bar for `symbol`, oldest first.
    fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>, DataError>;

    /// List the symbols this source can serve.
    fn available_symbols(&self) -> Result<Vec<String>, DataError>;

    /// Load `symbol` as a most-recent-first closing price series.
    fn load_series(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let bars = self.load_bars(symbol)?;
        tracing::debug!(symbol, bars = bars.len(), "Building price series");
        PriceSeries::from_bars(symbol, &bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    struct FixedSource;

    impl PriceSource for FixedSource {
        fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
            if symbol != "AAA" {
                return Err(DataError::NotFound(symbol.to_string()));
            }
            Ok((1..=3)
                .map(|d| Bar {
                    symbol: symbol.to_string(),
                    timestamp: Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap(),
                    open: Decimal::from(d),
                    high: Decimal::from(d),
                    low: Decimal::from(d),
                    close: Decimal::from(d),
                    volume: Decimal::ZERO,
                })
                .collect())
        }

        fn available_symbols(&self) -> Result<Vec<String>, DataError> {
            Ok(vec!["AAA".to_string()])
        }
    }

    #[test]
    fn test_load_series_default() {
        let series = FixedSource.load_series("AAA").unwrap();
        assert_eq!(series.closes(), &[3.0, 2.0, 1.0]);
        assert!(matches!(
            FixedSource.load_series("BBB"),
            Err(DataError::NotFound(_))
        ));
    }
}
