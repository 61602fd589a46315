//! Group-level consensus builders.
//!
//! - [`functional`]: bootstrap sign-consistency thresholding of pooled
//!   time-series correlations
//! - [`structural`]: distance-binned edge selection preserving the average
//!   edge-length distribution

pub mod functional;
pub mod structural;

use nalgebra::DMatrix;

use crate::error::{ConsensusError, Result};

/// Shape of a validated time-series stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeriesShape {
    pub nodes: usize,
    pub timepoints: usize,
    pub subjects: usize,
}

/// Check that every subject shares one non-empty nodes × timepoints shape.
pub(crate) fn validate_time_series(data: &[DMatrix<f64>]) -> Result<SeriesShape> {
    let first = data.first().ok_or(ConsensusError::EmptyInput("no subjects"))?;
    let (nodes, timepoints) = first.shape();
    if nodes == 0 {
        return Err(ConsensusError::EmptyInput("time series have no nodes"));
    }
    if timepoints == 0 {
        return Err(ConsensusError::EmptyInput("time series have no timepoints"));
    }

    for subject in data {
        if subject.shape() != (nodes, timepoints) {
            return Err(ConsensusError::mismatch(
                "time series",
                format!("{nodes}x{timepoints}"),
                format!("{}x{}", subject.nrows(), subject.ncols()),
            ));
        }
        if subject.iter().any(|v| !v.is_finite()) {
            return Err(ConsensusError::invalid("data", "time series must be finite"));
        }
    }

    Ok(SeriesShape {
        nodes,
        timepoints,
        subjects: data.len(),
    })
}

/// Check that `matrix` is `n`×`n`.
pub(crate) fn validate_square(what: &'static str, matrix: &DMatrix<f64>, n: usize) -> Result<()> {
    if matrix.shape() != (n, n) {
        return Err(ConsensusError::mismatch(
            what,
            format!("{n}x{n}"),
            format!("{}x{}", matrix.nrows(), matrix.ncols()),
        ));
    }
    Ok(())
}

/// Strict upper-triangle index pairs of an `n`×`n` matrix, row-major.
pub(crate) fn upper_triangle_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}
