use log::debug;
use ndarray::{Array, ArrayBase, Data, Dimension};

use super::{ProcessGroup, ReduceOp};
use crate::error::{Result, UtilErr};

/// Reduces a copy of `tensor` across the group and divides it by `world_size`.
///
/// The caller's array is left untouched. This is a blocking collective: every
/// member of `group` must call it at the same point of its control flow with an
/// array of the same shape and the same `op`, otherwise the call fails or hangs.
/// Failures are not retried, the collective state of the other workers is unknown.
///
/// # Arguments
/// * `group` - The process group to reduce over.
/// * `tensor` - This worker's value, of any shape and memory layout.
/// * `op` - The reduction operator, `ReduceOp::Sum` for a plain average.
/// * `world_size` - The divisor applied after the reduction.
///
/// # Returns
/// The reduced and divided copy, in standard layout.
///
/// # Errors
/// `InvalidArgument` if `world_size` is zero, or whatever the group reports when the
/// collective fails.
pub fn all_reduce_mean<G, S, D>(
    group: &G,
    tensor: &ArrayBase<S, D>,
    op: ReduceOp,
    world_size: usize,
) -> Result<Array<f32, D>>
where
    G: ProcessGroup + ?Sized,
    S: Data<Elem = f32>,
    D: Dimension,
{
    if world_size == 0 {
        return Err(UtilErr::InvalidArgument(
            "world_size must be greater than zero".into(),
        ));
    }

    let mut out = tensor.as_standard_layout().into_owned();
    let buf = out.as_slice_mut().ok_or_else(|| {
        UtilErr::InvalidArgument("tensor could not be laid out contiguously".into())
    })?;

    group.all_reduce(buf, op)?;

    let denom = world_size as f32;
    out.mapv_inplace(|x| x / denom);

    let rank = group.rank();
    debug!(rank = rank, world_size = world_size; "averaged {} elements with {op:?}", out.len());
    Ok(out)
}

/// Averages `tensor` across the whole group, summing and dividing by the group's size.
pub fn average<G, S, D>(group: &G, tensor: &ArrayBase<S, D>) -> Result<Array<f32, D>>
where
    G: ProcessGroup + ?Sized,
    S: Data<Elem = f32>,
    D: Dimension,
{
    all_reduce_mean(group, tensor, ReduceOp::Sum, group.world_size())
}
