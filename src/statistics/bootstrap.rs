//! Bootstrap resampling of pooled time series.
//!
//! Each replicate draws its columns with replacement from the pooled
//! node × time matrix. Replicates are seeded independently from a base seed
//! and their index, so the set of replicates does not depend on how the loop
//! is scheduled.

use nalgebra::DMatrix;
use rand::Rng;

/// Counter-based RNG seed generation using SplitMix64.
///
/// This is a stateless PRF that generates deterministic, well-distributed
/// seeds from a base seed and counter. Using this instead of simple addition
/// avoids correlated streams for neighbouring replicates.
///
/// # Arguments
///
/// * `base_seed` - Base random seed
/// * `counter` - Replicate index (0, 1, 2, ...)
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    // SplitMix64, see https://xoshiro.di.unimi.it/splitmix64.c
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Resample columns of `pooled` uniformly with replacement into `out`.
///
/// `out` must have as many rows as `pooled`; its column count is the number
/// of draws. Columns are drawn left to right, one `random_range` call each.
///
/// # Panics
///
/// Panics if the row counts differ.
pub fn resample_columns_into<R: Rng>(pooled: &DMatrix<f64>, rng: &mut R, out: &mut DMatrix<f64>) {
    assert_eq!(
        out.nrows(),
        pooled.nrows(),
        "Output buffer must have same row count as pooled data"
    );

    let n_cols = pooled.ncols();
    if n_cols == 0 {
        return;
    }

    for mut column in out.column_iter_mut() {
        let source = rng.random_range(0..n_cols);
        column.copy_from(&pooled.column(source));
    }
}
