//! Bootstrap-thresholded functional consensus.
//!
//! All subjects' time series are concatenated per node and correlated to
//! give the group matrix. Bootstrap replicates of the pooled series give a
//! percentile interval for every edge; edges whose interval changes sign
//! are zeroed.
//!
//! Replicate `b` is driven by its own generator seeded with
//! `counter_rng_seed(seed, b)`, so the output is bit-identical for a given
//! seed whatever the worker count.

use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{upper_triangle_pairs, validate_time_series, SeriesShape};
use crate::config::BootstrapConfig;
use crate::error::Result;
use crate::result::{FunctionalConsensus, FunctionalMetadata};
use crate::statistics::{
    correlation_matrix, counter_rng_seed, percentile_bounds, resample_columns_into,
    row_correlations,
};
use crate::thread_pool;
use crate::types::{ConnectivityMatrix, TimeSeries};

/// Thresholded group functional connectivity matrix.
///
/// `data` holds one nodes × timepoints matrix per subject.
///
/// # Errors
///
/// Invalid configuration is reported before the data is inspected, then
/// shape mismatches between subjects.
pub fn func_consensus(
    data: &[TimeSeries],
    config: &BootstrapConfig,
) -> Result<ConnectivityMatrix> {
    Ok(func_consensus_detailed(data, config)?.matrix)
}

/// Like [`func_consensus`], with the base seed drawn from `rng`.
///
/// `config.seed` is ignored. Exactly one `u64` is taken from `rng`, and only
/// after validation succeeds.
pub fn func_consensus_with_rng<R: Rng>(
    data: &[TimeSeries],
    config: &BootstrapConfig,
    rng: &mut R,
) -> Result<ConnectivityMatrix> {
    config.validate()?;
    let shape = validate_time_series(data)?;
    let seed: u64 = rng.random();
    Ok(run(data, shape, config, seed)?.matrix)
}

/// Thresholded matrix together with the interval bounds and run metadata.
pub fn func_consensus_detailed(
    data: &[TimeSeries],
    config: &BootstrapConfig,
) -> Result<FunctionalConsensus> {
    config.validate()?;
    let shape = validate_time_series(data)?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    run(data, shape, config, seed)
}

/// Group average of per-subject correlation matrices.
pub fn func_correlation(data: &[TimeSeries]) -> Result<ConnectivityMatrix> {
    let shape = validate_time_series(data)?;

    let mut sum = DMatrix::<f64>::zeros(shape.nodes, shape.nodes);
    for subject in data {
        sum += correlation_matrix(subject);
    }
    Ok(sum / shape.subjects as f64)
}

/// Concatenate subjects along time: column `t + T * s` is subject `s` at `t`.
pub fn pool_subjects(data: &[TimeSeries]) -> Result<DMatrix<f64>> {
    let shape = validate_time_series(data)?;
    Ok(pool(data, shape))
}

fn pool(data: &[TimeSeries], shape: SeriesShape) -> DMatrix<f64> {
    let t = shape.timepoints;
    DMatrix::from_fn(shape.nodes, t * shape.subjects, |i, c| data[c / t][(i, c % t)])
}

fn run(
    data: &[TimeSeries],
    shape: SeriesShape,
    config: &BootstrapConfig,
    seed: u64,
) -> Result<FunctionalConsensus> {
    debug!(
        nodes = shape.nodes,
        timepoints = shape.timepoints,
        subjects = shape.subjects,
        n_boot = config.n_boot,
        ci = config.ci,
        seed,
        "building functional consensus"
    );

    let pooled = pool(data, shape);
    let mut matrix = correlation_matrix(&pooled);
    let edges = upper_triangle_pairs(shape.nodes);

    let n_boot = config.n_boot;
    let draws = shape.timepoints;
    let replicates = thread_pool::install(config.threads, || {
        bootstrap_replicates(&pooled, draws, &edges, n_boot, seed)
    })?;

    let n = shape.nodes;
    let (p_lo, p_hi) = config.percentiles();
    let mut lower = DMatrix::identity(n, n);
    let mut upper = DMatrix::identity(n, n);
    let mut buffer = Vec::with_capacity(n_boot);
    let mut retained_edges = 0;

    for (e, &(i, j)) in edges.iter().enumerate() {
        buffer.clear();
        buffer.extend(replicates.iter().filter_map(|replicate| replicate[e]));
        let (lo, hi) = if buffer.is_empty() {
            (0.0, 0.0)
        } else {
            percentile_bounds(&mut buffer, p_lo, p_hi)
        };
        lower[(i, j)] = lo;
        lower[(j, i)] = lo;
        upper[(i, j)] = hi;
        upper[(j, i)] = hi;

        if is_sign_consistent(lo, hi) {
            retained_edges += 1;
        } else {
            matrix[(i, j)] = 0.0;
            matrix[(j, i)] = 0.0;
        }
    }

    if retained_edges == 0 && !edges.is_empty() {
        warn!(edges = edges.len(), "no edge survived bootstrap thresholding");
    }
    debug!(retained_edges, total_edges = edges.len(), "functional consensus done");

    Ok(FunctionalConsensus {
        matrix,
        lower,
        upper,
        metadata: FunctionalMetadata {
            nodes: shape.nodes,
            timepoints: shape.timepoints,
            subjects: shape.subjects,
            n_boot,
            ci: config.ci,
            seed,
            retained_edges,
        },
    })
}

/// Upper-triangle correlations for every replicate, in replicate order.
///
/// An entry is `None` when one of its rows came out constant in that
/// replicate; such draws carry no information about the edge.
fn bootstrap_replicates(
    pooled: &DMatrix<f64>,
    draws: usize,
    edges: &[(usize, usize)],
    n_boot: usize,
    seed: u64,
) -> Vec<Vec<Option<f64>>> {
    let nodes = pooled.nrows();

    #[cfg(feature = "parallel")]
    let replicates: Vec<Vec<Option<f64>>> = (0..n_boot)
        .into_par_iter()
        .map_init(
            || DMatrix::<f64>::zeros(nodes, draws),
            |sample, b| replicate(pooled, edges, seed, b, sample),
        )
        .collect();

    #[cfg(not(feature = "parallel"))]
    let replicates: Vec<Vec<Option<f64>>> = {
        let mut sample = DMatrix::<f64>::zeros(nodes, draws);
        (0..n_boot)
            .map(|b| replicate(pooled, edges, seed, b, &mut sample))
            .collect()
    };

    replicates
}

fn replicate(
    pooled: &DMatrix<f64>,
    edges: &[(usize, usize)],
    seed: u64,
    b: usize,
    sample: &mut DMatrix<f64>,
) -> Vec<Option<f64>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, b as u64));
    resample_columns_into(pooled, &mut rng, sample);
    let (corr, defined) = row_correlations(sample);
    edges
        .iter()
        .map(|&(i, j)| (defined[i] && defined[j]).then_some(corr[(i, j)]))
        .collect()
}

/// Keep unless the bounds have opposite signs or are both zero.
///
/// An interval touching zero on one side only is kept.
fn is_sign_consistent(lo: f64, hi: f64) -> bool {
    sign(lo) + sign(hi) != 0
}

fn sign(x: f64) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}
