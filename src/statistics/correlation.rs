//! Pearson correlation between the rows of a node × sample matrix.

use nalgebra::DMatrix;

/// Relative tolerance below which a centred row counts as constant.
const ZERO_VARIANCE_TOLERANCE: f64 = 1e-12;

/// Pearson correlation matrix of the rows of `data`.
///
/// Returns an N×N matrix for an N×M input. The diagonal is exactly 1 and the
/// result is exactly symmetric. A row with zero variance has no defined
/// correlation; it is reported as 0 against every other row. Off-diagonal
/// values are clamped to [-1, 1].
pub fn correlation_matrix(data: &DMatrix<f64>) -> DMatrix<f64> {
    row_correlations(data).0
}

/// Correlation matrix plus, per row, whether its variance is non-zero.
///
/// An off-diagonal entry is defined only when both of its rows are.
pub fn row_correlations(data: &DMatrix<f64>) -> (DMatrix<f64>, Vec<bool>) {
    let n = data.nrows();
    let m = data.ncols();
    if m == 0 {
        return (DMatrix::identity(n, n), vec![false; n]);
    }

    let threshold = ZERO_VARIANCE_TOLERANCE * (m as f64).sqrt();
    let mut centred = data.clone();
    let mut norms = Vec::with_capacity(n);
    let mut defined = Vec::with_capacity(n);

    for mut row in centred.row_iter_mut() {
        let scale = row.amax();
        let mean = row.mean();
        row.add_scalar_mut(-mean);
        let norm = row.norm();
        norms.push(norm);
        defined.push(norm > threshold * scale);
    }

    let gram = &centred * centred.transpose();

    // Read the upper triangle only so the result is bitwise symmetric.
    let corr = DMatrix::from_fn(n, n, |i, j| {
        let (a, b) = (i.min(j), i.max(j));
        if a == b {
            1.0
        } else if defined[a] && defined[b] {
            (gram[(a, b)] / (norms[a] * norms[b])).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    });

    (corr, defined)
}
