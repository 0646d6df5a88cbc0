use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{
    collective::ReduceOp,
    error::{Result, UtilErr},
};

/// The seed used when a configuration doesn't name one.
pub const DEFAULT_SEED: u64 = 666;

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// The configuration of a `DistributedIterSampler`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub dataset_len: usize,
    pub total_iter: NonZeroUsize,
    pub batch_size: NonZeroUsize,
    pub world_size: NonZeroUsize,
    pub rank: usize,
    /// The last iteration completed before a restart, `None` on a fresh run.
    #[serde(default)]
    pub last_iter: Option<usize>,
    /// Shared by every worker of the job.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl SamplerConfig {
    /// Creates a new `SamplerConfig` for a fresh run with the default seed.
    ///
    /// # Arguments
    /// * `dataset_len` - The amount of samples in the dataset.
    /// * `total_iter` - The iteration budget of the job.
    /// * `batch_size` - The per-worker batch size.
    /// * `world_size` - The amount of workers in the job.
    /// * `rank` - This worker's rank.
    ///
    /// # Returns
    /// `InvalidArgument` if any of the counts is zero.
    pub fn new(
        dataset_len: usize,
        total_iter: usize,
        batch_size: usize,
        world_size: usize,
        rank: usize,
    ) -> Result<Self> {
        Ok(Self {
            dataset_len,
            total_iter: non_zero("total_iter", total_iter)?,
            batch_size: non_zero("batch_size", batch_size)?,
            world_size: non_zero("world_size", world_size)?,
            rank,
            last_iter: None,
            seed: DEFAULT_SEED,
        })
    }

    pub fn with_last_iter(mut self, last_iter: Option<usize>) -> Self {
        self.last_iter = last_iter;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// The configuration of a `PolyLrScheduler`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolyLrConfig {
    pub power: f32,
    pub total_iter: NonZeroUsize,
    #[serde(default)]
    pub last_iter: Option<usize>,
}

/// Everything a worker needs to set up its helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub sampler: SamplerConfig,
    pub schedule: PolyLrConfig,
    /// The operator used when averaging metrics and gradients.
    #[serde(default)]
    pub reduce_op: ReduceOp,
}

impl TrainingConfig {
    /// Parses a `TrainingConfig` from its JSON representation.
    ///
    /// # Errors
    /// `Config` if the document is malformed, including zero counts.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn non_zero(what: &str, n: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(n)
        .ok_or_else(|| UtilErr::InvalidArgument(format!("{what} must be greater than zero")))
}
