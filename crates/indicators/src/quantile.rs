/// Approximate quantile of an unordered series.
///
/// Picks rank `trunc(q * (len + 1) - 1)` of the ascending sort. Ranks that
/// fall on or outside the boundaries (`<= 0` or `>= len`) are not clamped and
/// give `None`, as do an empty series and `q` outside `[0, 1]`.
pub fn quantile(q: f64, prices: &[f64]) -> Option<f64> {
    if prices.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let len = prices.len();
    let rank = (q * (len as f64 + 1.0) - 1.0).trunc();
    if rank < 1.0 || rank >= len as f64 {
        return None;
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted[rank as usize])
}
