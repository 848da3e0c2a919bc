//! Simple returns, weight blending and index compounding

use itertools::izip;

/// Per-column simple returns between each current row and its comparison
/// row: `(current - previous) / previous`.
///
/// A zero comparison value yields a non-finite return; once blended it
/// poisons every later index value, so callers must treat non-finite output
/// as fatal for the whole range.
pub fn simple_returns(current: &[Vec<f64>], previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    izip!(current, previous)
        .map(|(cur, prev)| izip!(cur, prev).map(|(c, p)| (c - p) / p).collect())
        .collect()
}

/// Weighted period return per row: the sum of each column's return times
/// that column's weight for the same period.
pub fn blended_returns(returns: &[Vec<f64>], weights: &[Vec<f64>]) -> Vec<f64> {
    izip!(returns, weights)
        .map(|(row, w)| izip!(row, w).map(|(r, w)| r * w).sum())
        .collect()
}

/// Compound blended period returns into a performance index.
///
/// The index is seeded at 1.0, which is never emitted: the output holds one
/// value per period, starting with the result of the first period's return.
///
/// ```
/// use compound::engine::compound::compound_index;
///
/// assert_eq!(compound_index(&[0.1, -0.5]), vec![1.1, 0.55]);
/// assert!(compound_index(&[]).is_empty());
/// ```
pub fn compound_index(blended: &[f64]) -> Vec<f64> {
    let mut index = Vec::with_capacity(blended.len());
    let mut level = 1.0;
    for ret in blended {
        level *= 1.0 + ret;
        index.push(level);
    }
    index
}
