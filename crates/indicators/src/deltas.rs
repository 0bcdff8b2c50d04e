/// Differences spaced `n` periods apart: `prices[i] - prices[i + n]`,
/// most-recent pair first.
///
/// Empty when `n == 0` or fewer than `n + 1` closes are available.
pub fn deltas(n: usize, prices: &[f64]) -> Vec<f64> {
    spaced_pairs(n, prices)
        .map(|(newer, older)| newer - older)
        .collect()
}

/// Fractional change over `n` periods: `(prices[i] - prices[i + n]) /
/// prices[i + n]`, most-recent pair first.
///
/// A zero reference price yields an infinite or NaN entry.
pub fn convert_to_changes(n: usize, prices: &[f64]) -> Vec<f64> {
    spaced_pairs(n, prices)
        .map(|(newer, older)| (newer - older) / older)
        .collect()
}

fn spaced_pairs(n: usize, prices: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    let count = if n == 0 { 0 } else { prices.len().saturating_sub(n) };
    (0..count).map(move |i| (prices[i], prices[i + n]))
}
