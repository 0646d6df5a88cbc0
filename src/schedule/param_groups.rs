/// The learning rates of an optimizer's parameter groups.
///
/// Schedulers read the base rates once and write the decayed rates back after
/// every step, the optimizer itself stays outside this crate.
pub trait ParamGroups {
    /// Returns the amount of parameter groups.
    fn num_groups(&self) -> usize;

    /// Returns the current learning rate of `group`.
    ///
    /// # Panics
    /// If `group >= self.num_groups()`.
    fn learning_rate(&self, group: usize) -> f32;

    /// Overwrites the learning rate of `group`.
    ///
    /// # Panics
    /// If `group >= self.num_groups()`.
    fn set_learning_rate(&mut self, group: usize, lr: f32);
}

impl ParamGroups for [f32] {
    fn num_groups(&self) -> usize {
        self.len()
    }

    fn learning_rate(&self, group: usize) -> f32 {
        self[group]
    }

    fn set_learning_rate(&mut self, group: usize, lr: f32) {
        self[group] = lr;
    }
}

impl ParamGroups for Vec<f32> {
    fn num_groups(&self) -> usize {
        self.as_slice().num_groups()
    }

    fn learning_rate(&self, group: usize) -> f32 {
        self.as_slice().learning_rate(group)
    }

    fn set_learning_rate(&mut self, group: usize, lr: f32) {
        self.as_mut_slice().set_learning_rate(group, lr);
    }
}
