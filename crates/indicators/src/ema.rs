use crate::sma::sma;
use crate::{check_period, IndicatorError, IndicatorKind, SeriesIndicator};

/// Exponential Moving Average over a working window of the `3n` most recent
/// closes.
///
/// The oldest `n` values of the window seed the average with their SMA; the
/// remaining `2n` values are then folded in chronological order (from the
/// end of the slice toward index 0) with weight `2 / (n + 1)`.
///
/// `None` when `n == 0` or fewer than `3n` closes are available.
pub fn ema(n: usize, prices: &[f64]) -> Option<f64> {
    let m = n.checked_mul(3)?;
    if n == 0 || prices.len() < m {
        return None;
    }
    let window = &prices[..m];
    let weight = 2.0 / (n as f64 + 1.0);

    let seed = sma(n, &window[2 * n..])?;
    let value = window[..2 * n]
        .iter()
        .rev()
        .fold(seed, |prev, &price| (price - prev) * weight + prev);
    Some(value)
}

/// Rolling EMA series, most-recent-first: `ema(n, &prices[i..])` for each
/// offset `i` that still leaves a full `3n` window.
pub fn emas(n: usize, prices: &[f64]) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let Some(m) = n.checked_mul(3) else {
        return Vec::new();
    };
    if prices.len() < m {
        return Vec::new();
    }
    (0..=prices.len() - m)
        .filter_map(|start| ema(n, &prices[start..]))
        .collect()
}

/// Exponential Moving Average (EMA).
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    len: usize,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let len = check_period(IndicatorKind::Ema, period)?;
        Ok(Self { len })
    }
}

impl SeriesIndicator for Ema {
    fn compute(&self, closes: &[f64]) -> Option<f64> {
        ema(self.len, closes)
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Ema
    }

    fn period(&self) -> usize {
        self.len
    }

    fn min_len(&self) -> usize {
        self.len.saturating_mul(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    #[test]
    fn test_ema_seed_and_fold() {
        // Chronologically 1..=6. Seed = (1 + 2) / 2 = 1.5, w = 2/3.
        // 3 -> 2.5, 4 -> 3.5, 5 -> 4.5, 6 -> 5.5
        let xs = [6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        assert_close(ema(2, &xs).unwrap(), 5.5);
    }

    #[test]
    fn test_ema_ignores_values_beyond_window() {
        let xs = [6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 1000.0, -1000.0];
        assert_close(ema(2, &xs).unwrap(), 5.5);
    }

    #[test]
    fn test_ema_constant_series() {
        let xs = vec![42.25; 90];
        for n in [1, 5, 14, 30] {
            assert_close(ema(n, &xs).unwrap(), 42.25);
        }
    }

    #[test]
    fn test_ema_insufficient() {
        assert_eq!(ema(3, &[1.0; 8]), None);
        assert_eq!(ema(0, &[1.0; 8]), None);
    }

    #[test]
    fn test_emas_length_and_head() {
        let xs: Vec<f64> = (0..20).map(|i| 100.0 - i as f64 * 0.7).collect();
        let series = emas(3, &xs);
        // offsets 0..=11
        assert_eq!(series.len(), 12);
        assert_close(series[0], ema(3, &xs).unwrap());
        assert_close(series[5], ema(3, &xs[5..]).unwrap());
    }

    #[test]
    fn test_emas_short_input() {
        assert!(emas(3, &[1.0; 8]).is_empty());
        assert_eq!(emas(3, &[1.0; 9]).len(), 1);
        assert!(emas(0, &[1.0; 9]).is_empty());
    }

    #[test]
    fn test_ema_indicator() {
        let ind = Ema::new(2).unwrap();
        assert_eq!(ind.min_len(), 6);
        assert_close(ind.compute(&[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]).unwrap(), 5.5);
    }
}
