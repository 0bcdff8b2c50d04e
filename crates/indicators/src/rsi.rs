use crate::deltas::deltas;
use crate::{check_period, IndicatorError, IndicatorKind, SeriesIndicator};

/// Number of periods of history consumed per unit of `n`. With the
/// traditional `n = 14` this needs `14 * 14 + 1 = 197` closes.
const HISTORY_MULTIPLE: usize = 14;

/// Relative Strength Index with Wilder's smoothing.
///
/// Uses only the `14n + 1` most recent closes; any older history is ignored.
/// The oldest `n + 1` of the window seed the average gain and loss; the
/// remaining `13n` one-period changes are folded oldest-to-newest with
/// `avg = (avg * (n - 1) + x) / n`.
///
/// Returns `100.0` when the average loss is zero. `None` when `n == 0` or the
/// series is shorter than `14n + 1`.
pub fn calculate_rsi(n: usize, prices: &[f64]) -> Option<f64> {
    let min_len = min_len(n)?;
    if n == 0 || prices.len() < min_len {
        return None;
    }
    let window = &prices[..min_len];
    let split = (HISTORY_MULTIPLE - 1) * n;
    let initial = &window[..=split];
    let tail = &window[split..];

    let period = n as f64;
    let tail_diff = deltas(1, tail);
    let first_avg_gain = tail_diff.iter().filter(|d| **d > 0.0).sum::<f64>() / period;
    let first_avg_loss = -tail_diff.iter().filter(|d| **d < 0.0).sum::<f64>() / period;

    let init_diff = deltas(1, initial);
    let smooth = |avg: f64, x: f64| (avg * (period - 1.0) + x) / period;
    let (avg_gain, avg_loss) = init_diff.iter().rev().fold(
        (first_avg_gain, first_avg_loss),
        |(gain, loss), &d| {
            let up = if d > 0.0 { d } else { 0.0 };
            let down = if d < 0.0 { -d } else { 0.0 };
            (smooth(gain, up), smooth(loss, down))
        },
    );

    Some(rsi_from_averages(avg_gain, avg_loss))
}

fn min_len(n: usize) -> Option<usize> {
    n.checked_mul(HISTORY_MULTIPLE)?.checked_add(1)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Relative Strength Index (RSI).
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    len: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let len = check_period(IndicatorKind::Rsi, period)?;
        Ok(Self { len })
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self { len: 14 }
    }
}

impl SeriesIndicator for Rsi {
    fn compute(&self, closes: &[f64]) -> Option<f64> {
        calculate_rsi(self.len, closes)
    }

    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi
    }

    fn period(&self) -> usize {
        self.len
    }

    fn min_len(&self) -> usize {
        min_len(self.len).unwrap_or(usize::MAX)
    }
}
