use super::ReduceOp;
use crate::error::Result;

/// A handle onto the collective-communication substrate.
///
/// Implementations wrap whatever transport the training runtime uses (a ring
/// over sockets, NCCL, an in-process rendezvous). The helpers in this crate
/// never discover ranks on their own, the handle is always passed explicitly.
pub trait ProcessGroup {
    /// Returns this worker's rank inside the group.
    fn rank(&self) -> usize;

    /// Returns the amount of workers in the group.
    fn world_size(&self) -> usize;

    /// Reduces `buf` in place across every member of the group.
    ///
    /// This call blocks until all `world_size` members have called it. Every member
    /// must pass a buffer of the same length and the same `op`, at the same point of
    /// its control flow, otherwise the call fails or never returns.
    ///
    /// # Arguments
    /// * `buf` - This worker's contribution, overwritten with the reduced values.
    /// * `op` - The reduction operator.
    ///
    /// # Returns
    /// An error if the collective failed, the contents of `buf` are unspecified then.
    fn all_reduce(&self, buf: &mut [f32], op: ReduceOp) -> Result<()>;
}

impl<T: ProcessGroup + ?Sized> ProcessGroup for &T {
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn world_size(&self) -> usize {
        (**self).world_size()
    }

    fn all_reduce(&self, buf: &mut [f32], op: ReduceOp) -> Result<()> {
        (**self).all_reduce(buf, op)
    }
}

impl<T: ProcessGroup + ?Sized> ProcessGroup for Box<T> {
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn world_size(&self) -> usize {
        (**self).world_size()
    }

    fn all_reduce(&self, buf: &mut [f32], op: ReduceOp) -> Result<()> {
        (**self).all_reduce(buf, op)
    }
}
