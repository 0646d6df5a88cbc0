use std::{
    iter::{Copied, FusedIterator},
    num::NonZeroUsize,
    slice,
};

use log::{debug, warn};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::WorkerIdentity;
use crate::{
    config::SamplerConfig,
    error::{Result, UtilErr},
};

/// Builds the global index sequence every worker slices its block from.
///
/// The domain `[0, dataset_len)` is tiled `ceil(all_size / dataset_len)` times,
/// truncated to `all_size` and shuffled with `rng`. Two calls with generators in the
/// same state return the same sequence.
///
/// # Arguments
/// * `dataset_len` - The amount of samples in the dataset.
/// * `all_size` - The length of the sequence.
/// * `rng` - The generator that drives the shuffle.
///
/// # Returns
/// `InvalidArgument` if `dataset_len` is zero.
pub fn global_indices<R>(dataset_len: usize, all_size: usize, rng: &mut R) -> Result<Vec<usize>>
where
    R: Rng + ?Sized,
{
    if dataset_len == 0 {
        return Err(UtilErr::InvalidArgument(
            "dataset must contain at least one sample".into(),
        ));
    }

    let num_repeat = all_size.div_ceil(dataset_len);
    let mut indices: Vec<usize> = std::iter::repeat_n(0..dataset_len, num_repeat)
        .flatten()
        .take(all_size)
        .collect();

    indices.shuffle(rng);
    Ok(indices)
}

/// Whether a sampler's indices were already handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Fresh,
    Exhausted,
}

/// Samples dataset indices for a fixed iteration budget split across workers.
///
/// Every worker builds the same shuffled sequence of
/// `total_iter * batch_size * world_size` indices from the shared seed and keeps
/// the contiguous block of its rank. The block can only be iterated once, starting
/// after the batches a previous run already consumed.
///
/// A clone shares the block but starts `Exhausted`, so it can't hand the indices
/// out a second time.
#[derive(Debug)]
pub struct DistributedIterSampler {
    identity: WorkerIdentity,
    indices: Vec<usize>,
    total_iter: NonZeroUsize,
    batch_size: NonZeroUsize,
    last_iter: Option<usize>,
    state: SamplerState,
}

impl DistributedIterSampler {
    /// Creates a new `DistributedIterSampler` seeded from `config.seed`.
    ///
    /// # Arguments
    /// * `config` - The sampler's configuration.
    ///
    /// # Errors
    /// `RankOutOfRange` if `config.rank >= config.world_size`, `InvalidArgument` if the
    /// dataset is empty or the budget overflows.
    pub fn new(config: &SamplerConfig) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self::from_rng(config, &mut rng)
    }

    /// Creates a new `DistributedIterSampler` that shuffles with `rng`.
    ///
    /// `config.seed` is ignored. Every worker must pass a generator in the same state,
    /// otherwise the blocks overlap.
    ///
    /// # Arguments
    /// * `config` - The sampler's configuration.
    /// * `rng` - The generator that drives the shuffle.
    pub fn from_rng<R>(config: &SamplerConfig, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let identity = WorkerIdentity::new(config.rank, config.world_size)?;

        let own_size = config
            .total_iter
            .get()
            .checked_mul(config.batch_size.get())
            .ok_or_else(|| UtilErr::InvalidArgument("total_iter * batch_size overflows".into()))?;

        let all_size = own_size
            .checked_mul(identity.world_size())
            .ok_or_else(|| UtilErr::InvalidArgument("sampled index count overflows".into()))?;

        let global = global_indices(config.dataset_len, all_size, rng)?;
        let indices = global[identity.block(own_size)].to_vec();

        let rank = identity.rank();
        debug!(
            rank = rank,
            own_size = own_size,
            all_size = all_size;
            "sampler built over {} samples",
            config.dataset_len
        );

        Ok(Self {
            identity,
            indices,
            total_iter: config.total_iter,
            batch_size: config.batch_size,
            last_iter: config.last_iter,
            state: SamplerState::Fresh,
        })
    }

    /// Hands out the indices left after the resume offset.
    ///
    /// The first call yields this worker's block starting at `(last_iter + 1) * batch_size`,
    /// which is empty when the whole budget was already consumed.
    ///
    /// # Errors
    /// `SamplerExhausted` on every call after the first one.
    pub fn iter(&mut self) -> Result<SamplerIter<'_>> {
        match self.state {
            SamplerState::Exhausted => Err(UtilErr::SamplerExhausted),
            SamplerState::Fresh => {
                self.state = SamplerState::Exhausted;

                let offset = self.offset();
                let total_iter = self.total_iter.get();
                match self.last_iter {
                    Some(last_iter) if last_iter >= total_iter => {
                        warn!(last_iter = last_iter, total_iter = total_iter; "resuming past the iteration budget");
                    }
                    _ => {}
                }

                Ok(SamplerIter {
                    inner: self.indices[offset..].iter().copied(),
                })
            }
        }
    }

    /// Returns the amount of indices the first iteration yields.
    pub fn len(&self) -> usize {
        self.indices.len() - self.offset()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns this worker's whole block, ignoring the resume offset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn identity(&self) -> WorkerIdentity {
        self.identity
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    pub fn total_iter(&self) -> usize {
        self.total_iter.get()
    }

    pub fn last_iter(&self) -> Option<usize> {
        self.last_iter
    }

    fn offset(&self) -> usize {
        self.last_iter
            .map_or(0, |k| k.saturating_add(1).saturating_mul(self.batch_size.get()))
            .min(self.indices.len())
    }
}

impl Clone for DistributedIterSampler {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity,
            indices: self.indices.clone(),
            total_iter: self.total_iter,
            batch_size: self.batch_size,
            last_iter: self.last_iter,
            state: SamplerState::Exhausted,
        }
    }
}

/// The indices handed out by `DistributedIterSampler::iter`.
#[derive(Debug, Clone)]
pub struct SamplerIter<'a> {
    inner: Copied<slice::Iter<'a, usize>>,
}

impl Iterator for SamplerIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SamplerIter<'_> {}

impl FusedIterator for SamplerIter<'_> {}
