//! Percentiles and quartile-derived classification thresholds.

use serde::{Deserialize, Serialize};

use super::descriptive::sorted;
use super::error::StatsError;

/// Quartile boundaries used to bucket a value as rare / sometimes / often.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// 25th percentile.
    pub rare: f64,
    /// 50th percentile.
    pub sometimes: f64,
    /// 75th percentile.
    pub often: f64,
}

/// Linear-interpolated percentile at rank `p * (n - 1)`.
///
/// `p` is a fraction in `[0, 1]`; anything else is rejected. An empty slice
/// yields `Ok(None)`.
pub fn percentile(values: &[f64], p: f64) -> Result<Option<f64>, StatsError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::InvalidPercentile(p));
    }
    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(percentile_of_sorted(&sorted(values), p)))
}

/// Percentile over data that is already sorted ascending and non-empty.
pub(crate) fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

/// Quartile thresholds; requires at least four values.
pub fn data_driven_thresholds(values: &[f64]) -> Option<ThresholdSet> {
    if values.len() < 4 {
        return None;
    }
    let s = sorted(values);
    Some(ThresholdSet {
        rare: percentile_of_sorted(&s, 0.25),
        sometimes: percentile_of_sorted(&s, 0.50),
        often: percentile_of_sorted(&s, 0.75),
    })
}
