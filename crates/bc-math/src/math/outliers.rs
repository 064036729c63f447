//! Tukey fence outlier detection.

use super::descriptive::sorted;
use super::error::StatsError;
use super::quantile::percentile_of_sorted;

/// Minimum sample size for quartiles to be meaningful.
const MIN_SAMPLES: usize = 4;

/// Indices of values outside `[Q1 - k * IQR, Q3 + k * IQR]`.
///
/// Returns `Ok(None)` for fewer than four values and `Ok(Some(vec![]))` when
/// every value is inside the fences. Indices refer to the input order.
pub fn detect_outliers(values: &[f64], multiplier: f64) -> Result<Option<Vec<usize>>, StatsError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(StatsError::InvalidMultiplier(multiplier));
    }
    if values.len() < MIN_SAMPLES {
        return Ok(None);
    }
    let s = sorted(values);
    let q1 = percentile_of_sorted(&s, 0.25);
    let q3 = percentile_of_sorted(&s, 0.75);
    let iqr = q3 - q1;
    let lower = q1 - multiplier * iqr;
    let upper = q3 + multiplier * iqr;

    let flagged = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v < lower || **v > upper)
        .map(|(i, _)| i)
        .collect();
    Ok(Some(flagged))
}
