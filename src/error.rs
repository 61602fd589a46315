//! Error type shared by every consensus builder.

use thiserror::Error;

/// Failures surfaced by the consensus builders.
///
/// All variants are raised before any array work begins, so a failed call
/// has no side effects (in particular, no randomness is consumed).
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// A scalar parameter or input value is outside its valid domain.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// Two inputs disagree on the number of nodes, timepoints or shape.
    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Which input was inspected.
        what: &'static str,
        /// Shape implied by the other inputs.
        expected: String,
        /// Shape actually supplied.
        found: String,
    },

    /// A required input has zero length along some axis.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// The empirical distribution estimator was handed no observations.
    #[error("cannot estimate an empirical distribution from zero observations")]
    EmptyObservations,

    /// The call-scoped worker pool could not be created.
    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConsensusError>;

impl ConsensusError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(
        what: &'static str,
        expected: impl std::fmt::Display,
        found: impl std::fmt::Display,
    ) -> Self {
        Self::DimensionMismatch {
            what,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
