pub mod loader;
pub mod pivot;
pub mod types;

pub use loader::load_observations;
pub use pivot::{filter_scope, join_periods, pivot_period, select_periods, PeriodSelection};
pub use types::{LoadStats, Observation, RegionFeatureRow};
