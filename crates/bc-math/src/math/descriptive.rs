//! Descriptive statistics over slices of `f64`.
//!
//! Every function returns `None` when the input is too short for the
//! statistic to be defined. Callers pick their own fallback.

use super::error::StatsError;

/// Sorted copy of `values` using IEEE total ordering.
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation with Bessel's correction (n − 1).
///
/// Returns `None` for fewer than two values.
pub fn unbiased_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Population variance (denominator n).
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some(ss / values.len() as f64)
}

/// Median; the mean of the two central values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let s = sorted(values);
    let mid = s.len() / 2;
    if s.len() % 2 == 0 {
        Some((s[mid - 1] + s[mid]) / 2.0)
    } else {
        Some(s[mid])
    }
}

/// Mean after dropping `floor(n * fraction)` values from each sorted end.
///
/// `fraction` must lie in `[0, 0.5)`.
pub fn trimmed_mean(values: &[f64], fraction: f64) -> Result<Option<f64>, StatsError> {
    if !(0.0..0.5).contains(&fraction) {
        return Err(StatsError::InvalidTrimFraction(fraction));
    }
    if values.is_empty() {
        return Ok(None);
    }
    let s = sorted(values);
    let trim = ((s.len() as f64) * fraction).floor() as usize;
    if trim * 2 >= s.len() {
        return Ok(None);
    }
    Ok(mean(&s[trim..s.len() - trim]))
}

/// Spread between the largest and smallest value.
pub fn range(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn empty_inputs_have_no_result() {
        assert!(mean(&[]).is_none());
        assert!(median(&[]).is_none());
        assert!(unbiased_std(&[]).is_none());
        assert!(population_variance(&[]).is_none());
        assert!(range(&[]).is_none());
        assert_eq!(trimmed_mean(&[], 0.1), Ok(None));
    }

    #[test]
    fn unbiased_std_needs_two_values() {
        assert!(unbiased_std(&[4.2]).is_none());
        let sd = unbiased_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        // ss = 32, n - 1 = 7
        assert!(approx_eq(sd, (32.0f64 / 7.0).sqrt(), 1e-12));
    }

    #[test]
    fn population_variance_uses_n() {
        let v = population_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(approx_eq(v, 4.0, 1e-12));
        assert_eq!(population_variance(&[3.0]), Some(0.0));
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn trimmed_mean_drops_extremes() {
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(trimmed_mean(&values, 0.2), Ok(Some(3.0)));
        assert_eq!(trimmed_mean(&values, 0.0), Ok(Some(22.0)));
    }

    #[test]
    fn trimmed_mean_rejects_bad_fraction() {
        assert_eq!(
            trimmed_mean(&[1.0, 2.0], 0.5),
            Err(StatsError::InvalidTrimFraction(0.5))
        );
        assert!(trimmed_mean(&[1.0, 2.0], -0.1).is_err());
    }

    #[test]
    fn range_of_values() {
        assert_eq!(range(&[3.0, -1.0, 8.5]), Some(9.5));
        assert_eq!(range(&[2.0]), Some(0.0));
    }
}
