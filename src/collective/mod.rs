//! Cross-worker averaging on top of an explicit process group.

mod average;
mod group;
mod local;
mod reduce_op;

pub use average::{all_reduce_mean, average};
pub use group::ProcessGroup;
pub use local::LocalGroup;
pub use reduce_op::ReduceOp;
