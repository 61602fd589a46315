//! Percentile computation using O(n) selection algorithms.
//!
//! This module provides quantile computation using Rust's
//! `slice.select_nth_unstable_by()` which uses introselect for O(n) average
//! time. The interpolation rule is R-7 (linear between closest ranks), the
//! common default of numerical libraries.

/// Compute a single quantile from a mutable slice.
///
/// Uses `select_nth_unstable_by()` for O(n) expected time complexity.
/// The slice is partially reordered as a side effect.
///
/// # Arguments
///
/// * `data` - Mutable slice of values (will be partially reordered)
/// * `p` - Quantile probability in [0, 1]
///
/// # Panics
///
/// Panics if `data` is empty or if `p` is outside [0, 1].
pub fn compute_quantile(data: &mut [f64], p: f64) -> f64 {
    assert!(!data.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "Quantile probability must be in [0, 1]"
    );

    let n = data.len();
    if n == 1 {
        return data[0];
    }

    let h = (n - 1) as f64 * p;
    let h_floor = h.floor() as usize;
    let h_frac = h - h.floor();

    if h_floor >= n - 1 {
        let (_, &mut max, _) = data.select_nth_unstable_by(n - 1, |a, b| a.total_cmp(b));
        return max;
    }

    let (_, &mut lower, upper) = data.select_nth_unstable_by(h_floor, |a, b| a.total_cmp(b));

    if h_frac == 0.0 {
        return lower;
    }

    // Smallest element of the upper partition is the next order statistic.
    let upper_min = upper
        .iter()
        .copied()
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(lower);

    lower + h_frac * (upper_min - lower)
}

/// Two-sided percentile bounds of `data` at probabilities `lo` and `hi`.
///
/// The slice is reordered. Equivalent to two calls of [`compute_quantile`].
pub fn percentile_bounds(data: &mut [f64], lo: f64, hi: f64) -> (f64, f64) {
    let lower = compute_quantile(data, lo);
    let upper = compute_quantile(data, hi);
    (lower, upper)
}
