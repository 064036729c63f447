//! Normal-approximation confidence intervals for the mean.
//!
//! The critical value comes from a fixed z table and does not switch to a
//! Student-t quantile for small samples, so intervals for n < 30 are
//! narrower than the exact ones.

use serde::{Deserialize, Serialize};

use super::descriptive::{mean, unbiased_std};
use super::error::StatsError;

const LEVEL_TOL: f64 = 1e-9;

/// Supported confidence levels and their two-sided z critical values.
const CRITICAL_VALUES: [(f64, f64); 3] = [(0.90, 1.645), (0.95, 1.96), (0.99, 2.576)];

/// Symmetric interval around the sample mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub level: f64,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn half_width(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }
}

/// z critical value for a supported confidence level.
pub fn critical_value(level: f64) -> Result<f64, StatsError> {
    CRITICAL_VALUES
        .iter()
        .find(|(l, _)| (l - level).abs() < LEVEL_TOL)
        .map(|(_, z)| *z)
        .ok_or(StatsError::UnsupportedConfidenceLevel(level))
}

/// `mean ± z * std / sqrt(n)`; `None` for fewer than two values.
pub fn confidence_interval(
    values: &[f64],
    level: f64,
) -> Result<Option<ConfidenceInterval>, StatsError> {
    let z = critical_value(level)?;
    let (Some(m), Some(sd)) = (mean(values), unbiased_std(values)) else {
        return Ok(None);
    };
    let margin = z * sd / (values.len() as f64).sqrt();
    Ok(Some(ConfidenceInterval {
        level,
        mean: m,
        lower: m - margin,
        upper: m + margin,
    }))
}
