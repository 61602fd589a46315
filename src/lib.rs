//! # netconsensus
//!
//! Group-level consensus connectivity matrices from per-subject brain data.
//!
//! Two builders are provided:
//! - **Functional**: subjects' time series are pooled, correlated, and each
//!   edge is kept only if its bootstrap percentile interval does not change
//!   sign.
//! - **Structural**: a binary matrix is assembled bin by bin so that its
//!   edge-length distribution follows the pooled subject distribution,
//!   separately for inter- and intra-hemispheric edges.
//!
//! Both are pure functions of their inputs. Randomness is only used by the
//! functional builder and is fully determined by the configured seed.
//!
//! ## Quick Start
//!
//! ```ignore
//! use netconsensus::{func_consensus, struct_consensus, BootstrapConfig};
//!
//! // One nodes x timepoints matrix per subject.
//! let fc = func_consensus(&series, &BootstrapConfig::new().seed(0))?;
//!
//! // One weighted nodes x nodes matrix per subject.
//! let hemis = netconsensus::hemispheres_from_labels(&labels)?;
//! let sc = struct_consensus(&weights, &distance, &hemis)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod result;
mod thread_pool;
mod types;

// Functional modules
pub mod consensus;
pub mod output;
pub mod statistics;

// Re-exports for public API
pub use config::{BootstrapConfig, StructuralConfig, DEFAULT_CI, DEFAULT_N_BOOT};
pub use consensus::functional::{
    func_consensus, func_consensus_detailed, func_consensus_with_rng, func_correlation,
    pool_subjects,
};
pub use consensus::structural::{
    struct_consensus, struct_consensus_detailed, EdgeRank, EdgeStatistics,
};
pub use error::{ConsensusError, Result};
pub use result::{CategoryReport, FunctionalConsensus, FunctionalMetadata, StructuralConsensus};
pub use statistics::{ecdf, EmpiricalCdf};
pub use types::{
    hemispheres_from_labels, BinaryMatrix, ConnectivityMatrix, EdgeCategory, Hemisphere,
    TimeSeries,
};
