//! Distance-binned structural consensus.
//!
//! Builds a binary group matrix whose edge-length distribution follows the
//! pooled distribution across subjects, with density equal to the mean
//! subject density. Inter- and intra-hemispheric edges are handled
//! separately:
//!
//! 1. Pool the distances of every positive subject edge in the category.
//! 2. Split the pooled empirical CDF into `floor(pool / subjects)` bins.
//! 3. In each bin pick the edge present in the most subjects, breaking ties
//!    by mean positive weight, then by lowest `(i, j)`.
//!
//! The two category matrices are merged and symmetrized.

use std::cmp::Ordering;

use nalgebra::DMatrix;
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{upper_triangle_pairs, validate_square};
use crate::config::StructuralConfig;
use crate::error::{ConsensusError, Result};
use crate::result::{CategoryReport, StructuralConsensus};
use crate::statistics::ecdf;
use crate::thread_pool;
use crate::types::{BinaryMatrix, EdgeCategory, Hemisphere};

/// Binary group structural connectivity matrix.
///
/// `data` holds one weighted N×N matrix per subject (0 = absent edge),
/// `distance` the N×N node distances and `hemispheres` one label per node.
///
/// # Errors
///
/// Shape mismatches between the inputs, negative or non-finite distances
/// and non-finite weights are reported before any computation.
pub fn struct_consensus(
    data: &[DMatrix<f64>],
    distance: &DMatrix<f64>,
    hemispheres: &[Hemisphere],
) -> Result<BinaryMatrix> {
    let config = StructuralConfig::default();
    Ok(struct_consensus_detailed(data, distance, hemispheres, &config)?.matrix)
}

/// Structural consensus with per-category diagnostics.
pub fn struct_consensus_detailed(
    data: &[DMatrix<f64>],
    distance: &DMatrix<f64>,
    hemispheres: &[Hemisphere],
    config: &StructuralConfig,
) -> Result<StructuralConsensus> {
    config.validate()?;
    validate_inputs(data, distance, hemispheres)?;

    let n = hemispheres.len();
    debug!(nodes = n, subjects = data.len(), "building structural consensus");

    let stats = EdgeStatistics::from_subjects(data)?;
    let mut merged = DMatrix::<u8>::zeros(n, n);
    let mut categories = Vec::with_capacity(EdgeCategory::ALL.len());

    for kind in EdgeCategory::ALL {
        let eligible = eligible_edges(kind, distance, hemispheres);
        let (selected, report) = thread_pool::install(config.threads, || {
            select_category(kind, &eligible, data, &stats)
        })??;

        for &(i, j) in &selected {
            merged[(i, j)] = 1;
        }
        debug!(
            category = ?kind,
            pool_size = report.pool_size,
            target_edges = report.target_edges,
            selected = report.selected_edges,
            "category done"
        );
        categories.push(report);
    }

    let matrix = DMatrix::from_fn(n, n, |i, j| {
        u8::from(merged[(i, j)] != 0 || merged[(j, i)] != 0)
    });

    Ok(StructuralConsensus { matrix, categories })
}

/// Per-edge presence counts and positive-weight sums across subjects.
#[derive(Debug, Clone)]
pub struct EdgeStatistics {
    positive_count: DMatrix<usize>,
    positive_sum: DMatrix<f64>,
}

impl EdgeStatistics {
    /// Accumulate over all subject matrices.
    ///
    /// # Errors
    ///
    /// Every subject must be square and shaped like the first one.
    pub fn from_subjects(data: &[DMatrix<f64>]) -> Result<Self> {
        let n = data.first().map_or(0, |m| m.nrows());
        let mut positive_count = DMatrix::<usize>::zeros(n, n);
        let mut positive_sum = DMatrix::<f64>::zeros(n, n);

        for subject in data {
            validate_square("connectivity stack", subject, n)?;
            for j in 0..n {
                for i in 0..n {
                    let w = subject[(i, j)];
                    if w > 0.0 {
                        positive_count[(i, j)] += 1;
                        positive_sum[(i, j)] += w;
                    }
                }
            }
        }

        Ok(Self {
            positive_count,
            positive_sum,
        })
    }

    /// Subjects with a positive weight at `(i, j)`.
    pub fn positive_count(&self, i: usize, j: usize) -> usize {
        self.positive_count[(i, j)]
    }

    /// Mean of the positive weights at `(i, j)`; `None` if no subject has one.
    pub fn average_weight(&self, i: usize, j: usize) -> Option<f64> {
        match self.positive_count[(i, j)] {
            0 => None,
            c => Some(self.positive_sum[(i, j)] / c as f64),
        }
    }

    /// Total ranking key of edge `(i, j)`.
    pub fn rank(&self, i: usize, j: usize) -> EdgeRank {
        EdgeRank {
            positive_count: self.positive_count(i, j),
            average_weight: self.average_weight(i, j),
            edge: (i, j),
        }
    }
}

/// Ranking key for candidate edges within a bin.
///
/// Greater is better: more subjects first, then higher average weight (an
/// absent weight ranks below every real weight), then the lower `(i, j)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRank {
    /// Subjects with a positive weight.
    pub positive_count: usize,
    /// Mean positive weight, if any.
    pub average_weight: Option<f64>,
    /// Node pair, `i < j`.
    pub edge: (usize, usize),
}

impl Eq for EdgeRank {}

impl Ord for EdgeRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.positive_count
            .cmp(&other.positive_count)
            .then_with(|| compare_weights(self.average_weight, other.average_weight))
            .then_with(|| other.edge.cmp(&self.edge))
    }
}

impl PartialOrd for EdgeRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_weights(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// An undirected edge eligible for one category.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EligibleEdge {
    i: usize,
    j: usize,
    distance: f64,
}

/// Strict upper-triangle pairs admitted by `kind` with positive distance.
fn eligible_edges(
    kind: EdgeCategory,
    distance: &DMatrix<f64>,
    hemispheres: &[Hemisphere],
) -> Vec<EligibleEdge> {
    upper_triangle_pairs(hemispheres.len())
        .into_iter()
        .filter(|&(i, j)| kind.admits(hemispheres[i], hemispheres[j]))
        .map(|(i, j)| EligibleEdge {
            i,
            j,
            distance: distance[(i, j)],
        })
        .filter(|e| e.distance > 0.0)
        .collect()
}

/// Run the binning procedure for one category.
fn select_category(
    kind: EdgeCategory,
    eligible: &[EligibleEdge],
    data: &[DMatrix<f64>],
    stats: &EdgeStatistics,
) -> Result<(Vec<(usize, usize)>, CategoryReport)> {
    let pool: Vec<f64> = data
        .iter()
        .flat_map(move |subject| {
            eligible
                .iter()
                .filter(move |e| subject[(e.i, e.j)] > 0.0)
                .map(|e| e.distance)
        })
        .collect();

    if pool.is_empty() {
        debug!(category = ?kind, "no positive edges, category left empty");
        return Ok((Vec::new(), CategoryReport::empty(kind, eligible.len())));
    }

    let target = pool.len() as f64 / data.len() as f64;
    let bins = target.floor() as usize;

    let cdf = ecdf(&pool)?;
    let rescaled = cdf.rescaled(target);
    let quantiles = cdf.quantiles();

    let select = |n: usize| -> Option<(usize, usize)> {
        let (lo, hi) = bin_range(&rescaled, quantiles, n)?;
        let winner = eligible
            .iter()
            .filter(|e| e.distance >= lo && e.distance <= hi)
            .map(|e| stats.rank(e.i, e.j))
            .max()?;
        trace!(
            bin = n,
            lo,
            hi,
            edge = ?winner.edge,
            count = winner.positive_count,
            "bin selection"
        );
        Some(winner.edge)
    };

    #[cfg(feature = "parallel")]
    let winners: Vec<Option<(usize, usize)>> = (1..=bins).into_par_iter().map(select).collect();

    #[cfg(not(feature = "parallel"))]
    let winners: Vec<Option<(usize, usize)>> = (1..=bins).map(select).collect();

    let empty_bins = winners.iter().filter(|w| w.is_none()).count();
    if empty_bins > 0 {
        warn!(category = ?kind, empty_bins, bins, "bins without a selectable edge");
    }

    let mut selected: Vec<(usize, usize)> = winners.into_iter().flatten().collect();
    selected.sort_unstable();
    selected.dedup();

    let report = CategoryReport {
        kind,
        eligible_edges: eligible.len(),
        pool_size: pool.len(),
        target_edges: target,
        bins,
        empty_bins,
        selected_edges: selected.len(),
    };
    Ok((selected, report))
}

/// Distance range `[min, max]` of the quantiles whose rescaled probability
/// falls in `[n - 1, n)`, or `None` if the bin is empty.
fn bin_range(rescaled: &[i64], quantiles: &[f64], n: usize) -> Option<(f64, f64)> {
    let n = n as i64;
    let mut in_bin = rescaled
        .iter()
        .zip(quantiles)
        .filter(|&(&r, _)| r >= n - 1 && r < n)
        .map(|(_, &q)| q);

    let first = in_bin.next()?;
    Some(in_bin.fold((first, first), |(lo, hi), q| (lo.min(q), hi.max(q))))
}

fn validate_inputs(
    data: &[DMatrix<f64>],
    distance: &DMatrix<f64>,
    hemispheres: &[Hemisphere],
) -> Result<()> {
    let n = hemispheres.len();
    if n == 0 {
        return Err(ConsensusError::EmptyInput("no nodes"));
    }
    if data.is_empty() {
        return Err(ConsensusError::EmptyInput("no subjects"));
    }

    validate_square("distance matrix", distance, n)?;
    if distance.iter().any(|d| !d.is_finite() || *d < 0.0) {
        return Err(ConsensusError::invalid(
            "distance",
            "distances must be finite and non-negative",
        ));
    }

    for subject in data {
        validate_square("connectivity stack", subject, n)?;
        if subject.iter().any(|w| !w.is_finite()) {
            return Err(ConsensusError::invalid("data", "weights must be finite"));
        }
    }
    Ok(())
}
