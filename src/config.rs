//! Configuration for the consensus builders.

use serde::{Deserialize, Serialize};

use crate::error::{ConsensusError, Result};

/// Default number of bootstrap replicates.
pub const DEFAULT_N_BOOT: usize = 1_000;

/// Default confidence level, in percent.
pub const DEFAULT_CI: f64 = 95.0;

/// Configuration options for bootstrap-thresholded functional consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Bootstrap replicates to draw (default: 1,000).
    pub n_boot: usize,

    /// Confidence level in percent (default: 95).
    ///
    /// Bounds are taken at percentiles `100 - ci` and `ci` of the
    /// bootstrapped correlations. Values outside [0, 100] are rejected.
    pub ci: f64,

    /// Optional deterministic seed for resampling.
    ///
    /// When absent a base seed is drawn from the thread-local generator and
    /// the output is not reproducible.
    pub seed: Option<u64>,

    /// Optional worker count for the bootstrap loop.
    ///
    /// `None` runs on rayon's global pool. Ignored without the `parallel`
    /// feature. Never affects the result.
    pub threads: Option<usize>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_boot: DEFAULT_N_BOOT,
            ci: DEFAULT_CI,
            seed: None,
            threads: None,
        }
    }
}

impl BootstrapConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of bootstrap replicates.
    pub fn n_boot(mut self, n: usize) -> Self {
        self.n_boot = n;
        self
    }

    /// Set the confidence level in percent.
    pub fn ci(mut self, ci: f64) -> Self {
        self.ci = ci;
        self
    }

    /// Set a deterministic seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the bootstrap loop on a dedicated pool with `n` workers.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Check every parameter, without touching any data.
    pub fn validate(&self) -> Result<()> {
        if !self.ci.is_finite() || !(0.0..=100.0).contains(&self.ci) {
            return Err(ConsensusError::invalid(
                "ci",
                format!("must be between 0 and 100, got {}", self.ci),
            ));
        }
        if self.n_boot == 0 {
            return Err(ConsensusError::invalid("n_boot", "must be positive"));
        }
        validate_threads(self.threads)
    }

    /// Lower and upper percentile, as probabilities in [0, 1].
    pub(crate) fn percentiles(&self) -> (f64, f64) {
        ((100.0 - self.ci) / 100.0, self.ci / 100.0)
    }
}

/// Configuration options for distance-binned structural consensus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralConfig {
    /// Optional worker count for the per-bin selection loop.
    pub threads: Option<usize>,
}

impl StructuralConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the bin loop on a dedicated pool with `n` workers.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// Check every parameter, without touching any data.
    pub fn validate(&self) -> Result<()> {
        validate_threads(self.threads)
    }
}

fn validate_threads(threads: Option<usize>) -> Result<()> {
    match threads {
        Some(0) => Err(ConsensusError::invalid("threads", "must be positive")),
        _ => Ok(()),
    }
}
