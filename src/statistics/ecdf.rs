//! Empirical cumulative distribution function estimation.

use serde::Serialize;

use crate::error::{ConsensusError, Result};

/// Step-function estimate of a distribution from observed samples.
///
/// Stored as paired sequences: `probabilities[k]` is the fraction of
/// observations less than or equal to `quantiles[k]`. The first entry is a
/// sentinel `(0, min)` so the curve starts at zero probability on the
/// smallest observed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmpiricalCdf {
    probabilities: Vec<f64>,
    quantiles: Vec<f64>,
    sample_size: usize,
}

impl EmpiricalCdf {
    /// Cumulative probabilities, non-decreasing from 0 to 1.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Quantile values, non-decreasing; first entry duplicates the minimum.
    pub fn quantiles(&self) -> &[f64] {
        &self.quantiles
    }

    /// Number of points on the curve, sentinel included.
    pub fn len(&self) -> usize {
        self.quantiles.len()
    }

    /// Always false; an empty sample is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.quantiles.is_empty()
    }

    /// Number of observations the estimate was built from.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Probabilities scaled by `count` and rounded to the nearest integer.
    ///
    /// Ties round to even, so `2.5` maps to bin 2 and `3.5` to bin 4.
    pub fn rescaled(&self, count: f64) -> Vec<i64> {
        self.probabilities
            .iter()
            .map(|p| (p * count).round_ties_even() as i64)
            .collect()
    }
}

/// Estimate the empirical CDF of `observations`.
///
/// Observations are sorted and collapsed to unique values; the cumulative
/// count at each unique value is divided by the sample size.
///
/// # Errors
///
/// [`ConsensusError::EmptyObservations`] for an empty slice and
/// [`ConsensusError::InvalidArgument`] if any observation is not finite.
pub fn ecdf(observations: &[f64]) -> Result<EmpiricalCdf> {
    if observations.is_empty() {
        return Err(ConsensusError::EmptyObservations);
    }
    if let Some(bad) = observations.iter().find(|v| !v.is_finite()) {
        return Err(ConsensusError::invalid(
            "observations",
            format!("must be finite, got {bad}"),
        ));
    }

    let mut sorted = observations.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mut probabilities = vec![0.0];
    let mut quantiles = vec![sorted[0]];

    let mut cumulative = 0usize;
    for run in sorted.chunk_by(|a, b| a == b) {
        cumulative += run.len();
        quantiles.push(run[0]);
        probabilities.push(cumulative as f64 / n as f64);
    }

    Ok(EmpiricalCdf {
        probabilities,
        quantiles,
        sample_size: n,
    })
}
