use crate::ema::{ema, emas};
use crate::{check_period, mean, IndicatorError, IndicatorKind, SeriesIndicator};

/// Extra closes beyond `3n` that feed the trailing EMA series.
const TRAILING: usize = 5;

/// Trend steepness: the mean relative displacement of the trailing EMA
/// series from the current EMA, on a ratio scale centred on `1.0`.
///
/// Uses the `3n + 5` most recent closes. `mu = ema(n, window)` is the
/// reference level and each `e` in `emas(n, &window[1..])` contributes
/// `(mu - e) / mu + 1`. Values above `1.0` mean the EMA has been rising.
///
/// `None` when `n == 0`, the series is shorter than `3n + 5`, or `mu == 0`.
pub fn steep(n: usize, prices: &[f64]) -> Option<f64> {
    let min_len = min_len(n)?;
    if n == 0 || prices.len() < min_len {
        return None;
    }
    let window = &prices[..min_len];
    let mu = ema(n, window)?;
    if mu == 0.0 {
        return None;
    }
    let ratios: Vec<f64> = emas(n, &window[1..])
        .into_iter()
        .map(|e| (mu - e) / mu + 1.0)
        .collect();
    mean(&ratios)
}

fn min_len(n: usize) -> Option<usize> {
    n.checked_mul(3)?.checked_add(TRAILING)
}

/// EMA trend steepness.
#[derive(Debug, Clone, Copy)]
pub struct Steep {
    len: usize,
}

impl Steep {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let len = check_period(IndicatorKind::Steep, period)?;
        Ok(Self { len })
    }
}

impl SeriesIndicator for Steep {
    fn compute(&self, closes: &[f64]) -> Option<f64> {
        steep(self.len, closes)
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Steep
    }

    fn period(&self) -> usize {
        self.len
    }

    fn min_len(&self) -> usize {
        min_len(self.len).unwrap_or(usize::MAX)
    }
}
