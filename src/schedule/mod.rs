//! Learning rate schedules.

mod param_groups;
mod poly;

pub use param_groups::ParamGroups;
pub use poly::PolyLrScheduler;
