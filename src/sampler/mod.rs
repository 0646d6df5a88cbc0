//! Deterministic partitioning of a training budget's dataset indices across workers.

mod identity;
mod iter_sampler;

pub use identity::{WorkerIdentity, block_range};
pub use iter_sampler::{DistributedIterSampler, SamplerIter, SamplerState, global_indices};
