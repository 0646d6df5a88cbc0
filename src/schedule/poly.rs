use std::num::NonZeroUsize;

use log::debug;

use super::ParamGroups;
use crate::{
    config::PolyLrConfig,
    error::{Result, UtilErr},
};

/// Polynomial learning rate decay.
///
/// At iteration `t` every group's rate is `base_lr * (1 - t / total_iter) ^ power`.
/// Iterations past `total_iter` are clamped to it, so the rate bottoms out at zero
/// instead of raising a negative base to a fractional power.
#[derive(Debug, Clone)]
pub struct PolyLrScheduler {
    base_lrs: Vec<f32>,
    last_lr: Vec<f32>,
    power: f32,
    total_iter: NonZeroUsize,
    last_iter: usize,
}

impl PolyLrScheduler {
    /// Creates a new `PolyLrScheduler` and applies the rate of its first iteration.
    ///
    /// The current rates of `groups` are taken as the base rates, so when resuming
    /// they must hold the undecayed values.
    ///
    /// # Arguments
    /// * `groups` - The optimizer's parameter groups.
    /// * `power` - The decay exponent, finite and positive.
    /// * `total_iter` - The iteration budget the rate decays over.
    /// * `last_iter` - The last completed iteration, `None` on a fresh run.
    ///
    /// # Returns
    /// The scheduler positioned at `last_iter + 1`, or at `0` on a fresh run.
    ///
    /// # Errors
    /// `InvalidArgument` if `power` is not finite or not positive.
    pub fn new<G>(
        groups: &mut G,
        power: f32,
        total_iter: NonZeroUsize,
        last_iter: Option<usize>,
    ) -> Result<Self>
    where
        G: ParamGroups + ?Sized,
    {
        if !power.is_finite() || power <= 0. {
            return Err(UtilErr::InvalidArgument(format!(
                "power must be finite and positive, got {power}"
            )));
        }

        let base_lrs = (0..groups.num_groups())
            .map(|i| groups.learning_rate(i))
            .collect();

        let mut scheduler = Self {
            base_lrs,
            last_lr: Vec::new(),
            power,
            total_iter,
            last_iter: last_iter.map_or(0, |k| k.saturating_add(1)),
        };

        scheduler.apply(groups)?;
        Ok(scheduler)
    }

    /// Creates a new `PolyLrScheduler` from its configuration.
    ///
    /// # Arguments
    /// * `config` - The schedule's configuration.
    /// * `groups` - The optimizer's parameter groups.
    pub fn from_config<G>(config: &PolyLrConfig, groups: &mut G) -> Result<Self>
    where
        G: ParamGroups + ?Sized,
    {
        Self::new(groups, config.power, config.total_iter, config.last_iter)
    }

    /// Advances the schedule by exactly one iteration and writes the new rates.
    ///
    /// # Arguments
    /// * `groups` - The optimizer's parameter groups.
    ///
    /// # Errors
    /// `ShapeMismatch` if `groups` doesn't have as many groups as the base rates.
    pub fn step<G>(&mut self, groups: &mut G) -> Result<()>
    where
        G: ParamGroups + ?Sized,
    {
        self.last_iter = self.last_iter.saturating_add(1);
        self.apply(groups)
    }

    /// Returns the decay factor at `iter`, in `[0, 1]`.
    pub fn factor(&self, iter: usize) -> f32 {
        let total = self.total_iter.get();
        let t = iter.min(total);
        let remaining = 1. - t as f64 / total as f64;
        remaining.powf(self.power as f64) as f32
    }

    /// Computes the rate of every group at `iter`.
    pub fn lr_at(&self, iter: usize) -> Vec<f32> {
        let factor = self.factor(iter);
        self.base_lrs.iter().map(|lr| lr * factor).collect()
    }

    /// Computes the rate of every group at the current iteration.
    pub fn get_lr(&self) -> Vec<f32> {
        self.lr_at(self.last_iter)
    }

    /// The rates most recently written to the parameter groups.
    pub fn last_lr(&self) -> &[f32] {
        &self.last_lr
    }

    pub fn base_lrs(&self) -> &[f32] {
        &self.base_lrs
    }

    /// The iteration the current rates belong to.
    pub fn last_iter(&self) -> usize {
        self.last_iter
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn total_iter(&self) -> usize {
        self.total_iter.get()
    }

    fn apply<G>(&mut self, groups: &mut G) -> Result<()>
    where
        G: ParamGroups + ?Sized,
    {
        if groups.num_groups() != self.base_lrs.len() {
            return Err(UtilErr::ShapeMismatch {
                what: "parameter groups",
                got: groups.num_groups(),
                expected: self.base_lrs.len(),
            });
        }

        let lrs = self.get_lr();
        for (i, &lr) in lrs.iter().enumerate() {
            groups.set_learning_rate(i, lr);
        }

        let iter = self.last_iter;
        debug!(iter = iter; "learning rates set to {lrs:?}");
        self.last_lr = lrs;
        Ok(())
    }
}
