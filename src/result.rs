//! Result types returned by the detailed consensus entry points.

use nalgebra::{DMatrix, Scalar};
use serde::{Serialize, Serializer};

use crate::types::EdgeCategory;

/// Full result of bootstrap-thresholded functional consensus.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionalConsensus {
    /// Thresholded group correlation matrix.
    #[serde(serialize_with = "serialize_rows")]
    pub matrix: DMatrix<f64>,

    /// Per-edge bound at percentile `100 - ci` (diagonal 1).
    #[serde(serialize_with = "serialize_rows")]
    pub lower: DMatrix<f64>,

    /// Per-edge bound at percentile `ci` (diagonal 1).
    #[serde(serialize_with = "serialize_rows")]
    pub upper: DMatrix<f64>,

    /// Metadata for reproducing the run.
    pub metadata: FunctionalMetadata,
}

/// Parameters and counts describing a functional consensus run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionalMetadata {
    /// Number of nodes.
    pub nodes: usize,
    /// Timepoints per subject, also the size of each bootstrap draw.
    pub timepoints: usize,
    /// Number of subjects pooled.
    pub subjects: usize,
    /// Bootstrap replicates drawn.
    pub n_boot: usize,
    /// Confidence level in percent.
    pub ci: f64,
    /// Base seed the replicates were derived from.
    pub seed: u64,
    /// Off-diagonal undirected edges kept.
    pub retained_edges: usize,
}

/// Full result of distance-binned structural consensus.
#[derive(Debug, Clone, Serialize)]
pub struct StructuralConsensus {
    /// Binary, symmetric group matrix with zero diagonal.
    #[serde(serialize_with = "serialize_rows")]
    pub matrix: DMatrix<u8>,

    /// One report per edge category, inter first.
    pub categories: Vec<CategoryReport>,
}

impl StructuralConsensus {
    /// Report for `kind`.
    pub fn category(&self, kind: EdgeCategory) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.kind == kind)
    }

    /// Undirected edges in the final matrix.
    pub fn edge_count(&self) -> usize {
        let n = self.matrix.nrows();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.matrix[(i, j)] != 0)
            .count()
    }
}

/// Diagnostics for one edge category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    /// Which category this describes.
    pub kind: EdgeCategory,
    /// Undirected node pairs in the category with positive distance.
    pub eligible_edges: usize,
    /// Distances pooled across subjects (one per positive subject edge).
    pub pool_size: usize,
    /// Average edges per subject, `pool_size / subjects`.
    pub target_edges: f64,
    /// Bins iterated, `floor(target_edges)`.
    pub bins: usize,
    /// Bins that received no quantile or no candidate edge.
    pub empty_bins: usize,
    /// Distinct edges selected.
    pub selected_edges: usize,
}

impl CategoryReport {
    pub(crate) fn empty(kind: EdgeCategory, eligible_edges: usize) -> Self {
        Self {
            kind,
            eligible_edges,
            pool_size: 0,
            target_edges: 0.0,
            bins: 0,
            empty_bins: 0,
            selected_edges: 0,
        }
    }
}

/// Serialize a matrix as a list of rows.
fn serialize_rows<T, S>(matrix: &DMatrix<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Scalar + Serialize,
    S: Serializer,
{
    let rows: Vec<Vec<T>> = matrix
        .row_iter()
        .map(|row| row.iter().cloned().collect())
        .collect();
    rows.serialize(serializer)
}
