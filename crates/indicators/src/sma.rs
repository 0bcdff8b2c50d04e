use crate::{check_period, mean, IndicatorError, IndicatorKind, SeriesIndicator};

/// Simple Moving Average of the `n` most recent closes.
///
/// `None` when `n == 0` or the series holds fewer than `n` values.
pub fn sma(n: usize, prices: &[f64]) -> Option<f64> {
    if n == 0 || n > prices.len() {
        return None;
    }
    mean(&prices[..n])
}

/// Rolling SMA series, most-recent-first: `sma(n, &prices[i..])` for every
/// offset that still has `n` values.
pub fn smas(n: usize, prices: &[f64]) -> Vec<f64> {
    if n == 0 || n > prices.len() {
        return Vec::new();
    }
    prices.windows(n).filter_map(mean).collect()
}

/// Simple Moving Average (SMA).
#[derive(Debug, Clone, Copy)]
pub struct Sma {
    len: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let len = check_period(IndicatorKind::Sma, period)?;
        Ok(Self { len })
    }
}

impl SeriesIndicator for Sma {
    fn compute(&self, closes: &[f64]) -> Option<f64> {
        sma(self.len, closes)
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Sma
    }

    fn period(&self) -> usize {
        self.len
    }

    fn min_len(&self) -> usize {
        self.len
    }
}
