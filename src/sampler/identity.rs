use std::num::NonZeroUsize;
use std::ops::Range;

use crate::error::{Result, UtilErr};

/// Returns the contiguous block of `own_size` positions owned by `rank`.
///
/// Blocks of consecutive ranks are adjacent and disjoint, ranks `0..world_size`
/// together cover `[0..own_size * world_size)`.
pub fn block_range(own_size: usize, rank: usize) -> Range<usize> {
    let start = own_size * rank;
    start..start + own_size
}

/// The identity of a worker inside a training job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerIdentity {
    rank: usize,
    world_size: NonZeroUsize,
}

impl WorkerIdentity {
    /// Creates a new `WorkerIdentity`.
    ///
    /// # Arguments
    /// * `rank` - This worker's index, in `[0, world_size)`.
    /// * `world_size` - The amount of workers in the job.
    ///
    /// # Returns
    /// `RankOutOfRange` if `rank >= world_size`.
    pub fn new(rank: usize, world_size: NonZeroUsize) -> Result<Self> {
        if rank >= world_size.get() {
            return Err(UtilErr::RankOutOfRange {
                rank,
                world_size: world_size.get(),
            });
        }

        Ok(Self { rank, world_size })
    }

    #[inline]
    pub fn rank(self) -> usize {
        self.rank
    }

    #[inline]
    pub fn world_size(self) -> usize {
        self.world_size.get()
    }

    /// Returns this worker's block when every worker owns `own_size` positions.
    #[inline]
    pub fn block(self, own_size: usize) -> Range<usize> {
        block_range(own_size, self.rank)
    }
}
