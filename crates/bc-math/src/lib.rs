//! Bridge cadence statistics primitives.

pub mod math;

pub use math::descriptive::*;
pub use math::error::StatsError;
pub use math::interval::{confidence_interval, critical_value, ConfidenceInterval};
pub use math::outliers::detect_outliers;
pub use math::quantile::{data_driven_thresholds, percentile, ThresholdSet};
pub use math::regression::{linear_regression, LinearFit};
