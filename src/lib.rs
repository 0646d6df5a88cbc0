//! Helpers for data-parallel training: cross-worker averaging, polynomial learning
//! rate decay and a deterministic index sampler that splits an iteration budget
//! across workers.

pub mod collective;
pub mod config;
pub mod error;
pub mod sampler;
pub mod schedule;

pub use collective::{LocalGroup, ProcessGroup, ReduceOp, all_reduce_mean, average};
pub use config::{PolyLrConfig, SamplerConfig, TrainingConfig};
pub use error::{Result, UtilErr};
pub use sampler::{DistributedIterSampler, SamplerState, WorkerIdentity};
pub use schedule::{ParamGroups, PolyLrScheduler};
