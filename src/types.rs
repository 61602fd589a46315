//! Type aliases and common types.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{ConsensusError, Result};

/// One subject's functional time series: nodes × timepoints.
pub type TimeSeries = DMatrix<f64>;

/// Real-valued N×N connectivity matrix.
pub type ConnectivityMatrix = DMatrix<f64>;

/// Binary N×N connectivity matrix (entries are 0 or 1).
pub type BinaryMatrix = DMatrix<u8>;

/// Hemisphere assignment of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    /// Nodes labelled `0`.
    Left,
    /// Nodes labelled `1`.
    Right,
}

impl TryFrom<u8> for Hemisphere {
    type Error = ConsensusError;

    fn try_from(label: u8) -> Result<Self> {
        match label {
            0 => Ok(Hemisphere::Left),
            1 => Ok(Hemisphere::Right),
            other => Err(ConsensusError::invalid(
                "hemiid",
                format!("labels must be 0 or 1, got {other}"),
            )),
        }
    }
}

/// Convert a binary label vector into hemisphere assignments.
pub fn hemispheres_from_labels(labels: &[u8]) -> Result<Vec<Hemisphere>> {
    labels.iter().map(|&l| Hemisphere::try_from(l)).collect()
}

/// Class of undirected edge, by the hemispheres of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeCategory {
    /// One endpoint in each hemisphere.
    Inter,
    /// Both endpoints in the same hemisphere.
    Intra,
}

impl EdgeCategory {
    /// Both categories, in processing order.
    pub const ALL: [EdgeCategory; 2] = [EdgeCategory::Inter, EdgeCategory::Intra];

    /// Whether an edge between nodes in hemispheres `a` and `b` belongs here.
    pub fn admits(self, a: Hemisphere, b: Hemisphere) -> bool {
        match self {
            EdgeCategory::Inter => a != b,
            EdgeCategory::Intra => a == b,
        }
    }
}
