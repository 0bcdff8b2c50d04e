//! Technical indicators over closing-price series.
//!
//! Every function takes prices ordered **most-recent-first** (index 0 is the
//! latest close) and never mutates its input. Insufficient data is reported
//! as `None` for scalar results and as an empty `Vec` for sequences.

pub mod deltas;
pub mod ema;
pub mod quantile;
pub mod rsi;
pub mod sma;
pub mod steep;

pub use deltas::{convert_to_changes, deltas};
pub use ema::{ema, emas, Ema};
pub use quantile::quantile;
pub use rsi::{calculate_rsi, Rsi};
pub use sma::{sma, smas, Sma};
pub use steep::{steep, Steep};

use serde::{Deserialize, Serialize};

/// Errors raised when constructing an indicator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("{kind} period must be > 0")]
    InvalidPeriod { kind: IndicatorKind },
}

/// The indicators that can be evaluated through [`SeriesIndicator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Steep,
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Steep => "Steep",
        };
        f.write_str(name)
    }
}

/// Trait for indicators evaluated over a whole price series at once.
/// Implementations are stateless; the same value can be reused across series.
pub trait SeriesIndicator: Send + Sync {
    /// Evaluate the indicator over `closes` (most-recent-first).
    fn compute(&self, closes: &[f64]) -> Option<f64>;

    /// Which indicator this is.
    fn kind(&self) -> IndicatorKind;

    /// The window length the indicator was built with.
    fn period(&self) -> usize;

    /// The minimum number of closes needed before `compute` returns a value.
    fn min_len(&self) -> usize;

    /// Whether `closes` is long enough to produce output.
    fn is_ready(&self, closes: &[f64]) -> bool {
        closes.len() >= self.min_len()
    }
}

pub(crate) fn check_period(kind: IndicatorKind, period: usize) -> Result<usize, IndicatorError> {
    if period == 0 {
        Err(IndicatorError::InvalidPeriod { kind })
    } else {
        Ok(period)
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub(crate) fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

#[cfg(test)]
pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_indicators() {
        let indicators: Vec<Box<dyn SeriesIndicator>> = vec![
            Box::new(Sma::new(3).unwrap()),
            Box::new(Ema::new(3).unwrap()),
            Box::new(Rsi::new(2).unwrap()),
            Box::new(Steep::new(2).unwrap()),
        ];
        let closes = vec![10.0; 40];
        for ind in &indicators {
            assert!(ind.is_ready(&closes), "{} not ready", ind.kind());
            assert!(ind.compute(&closes).is_some());
        }
    }

    #[test]
    fn test_zero_period_rejected() {
        assert_eq!(
            Sma::new(0).unwrap_err(),
            IndicatorError::InvalidPeriod { kind: IndicatorKind::Sma }
        );
        assert!(Rsi::new(0).is_err());
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }
}
