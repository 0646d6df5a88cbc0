use serde::{Deserialize, Serialize};

/// The element-wise operator a collective reduction combines contributions with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReduceOp {
    #[default]
    Sum,
    Product,
    Min,
    Max,
}

impl ReduceOp {
    /// Combines two elements.
    ///
    /// # Arguments
    /// * `acc` - The value accumulated so far.
    /// * `x` - The incoming contribution.
    ///
    /// # Returns
    /// The reduced value.
    #[inline]
    pub fn apply(self, acc: f32, x: f32) -> f32 {
        match self {
            ReduceOp::Sum => acc + x,
            ReduceOp::Product => acc * x,
            ReduceOp::Min => acc.min(x),
            ReduceOp::Max => acc.max(x),
        }
    }

    /// Reduces `src` into `acc` element by element.
    ///
    /// # Panics
    /// In debug builds, if the slices have different lengths.
    pub(crate) fn fold_into(self, acc: &mut [f32], src: &[f32]) {
        debug_assert_eq!(acc.len(), src.len(), "reduced buffers must have the same length");
        acc.iter_mut()
            .zip(src)
            .for_each(|(a, &x)| *a = self.apply(*a, x));
    }
}
