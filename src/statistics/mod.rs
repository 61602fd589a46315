//! Statistical primitives for consensus construction.
//!
//! This module provides the numeric building blocks shared by the builders:
//! - Empirical CDF estimation over flat samples
//! - Pearson correlation between node time series
//! - Column bootstrap with counter-based per-replicate seeding
//! - Percentile computation using O(n) selection algorithms

mod bootstrap;
mod correlation;
mod ecdf;
mod quantile;

pub use bootstrap::{counter_rng_seed, resample_columns_into};
pub use correlation::{correlation_matrix, row_correlations};
pub use ecdf::{ecdf, EmpiricalCdf};
pub use quantile::{compute_quantile, percentile_bounds};
