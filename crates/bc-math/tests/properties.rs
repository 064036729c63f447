//! Property-based tests for bc-math statistics primitives.
//!
//! Uses proptest to verify ordering and bounds properties across many random inputs.

use proptest::prelude::*;
use bc_math::{
    confidence_interval, data_driven_thresholds, detect_outliers, mean, median, percentile,
    population_variance, trimmed_mean, unbiased_std,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn finite_values(min_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6..1.0e6f64, min_len..64)
}

// ============================================================================
// percentile properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// percentile is non-decreasing in p for a fixed dataset.
    #[test]
    fn percentile_monotone_in_p(values in finite_values(1), a in 0.0..=1.0f64, b in 0.0..=1.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let p_lo = percentile(&values, lo).unwrap().unwrap();
        let p_hi = percentile(&values, hi).unwrap().unwrap();
        prop_assert!(p_lo <= p_hi + TOL, "p({})={} > p({})={}", lo, p_lo, hi, p_hi);
    }

    /// percentile(v, 0) is the minimum and percentile(v, 1) the maximum.
    #[test]
    fn percentile_endpoints(values in finite_values(1)) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(percentile(&values, 0.0).unwrap(), Some(min));
        prop_assert_eq!(percentile(&values, 1.0).unwrap(), Some(max));
    }

    /// The median matches the 50th percentile.
    #[test]
    fn median_is_p50(values in finite_values(1)) {
        let m = median(&values).unwrap();
        let p50 = percentile(&values, 0.5).unwrap().unwrap();
        prop_assert!((m - p50).abs() <= TOL * m.abs().max(1.0));
    }

    /// Quartile thresholds are ordered rare <= sometimes <= often.
    #[test]
    fn thresholds_are_ordered(values in finite_values(4)) {
        let t = data_driven_thresholds(&values).unwrap();
        prop_assert!(t.rare <= t.sometimes && t.sometimes <= t.often);
    }
}

// ============================================================================
// dispersion and interval properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Standard deviation and variance are never negative.
    #[test]
    fn dispersion_non_negative(values in finite_values(2)) {
        prop_assert!(unbiased_std(&values).unwrap() >= 0.0);
        prop_assert!(population_variance(&values).unwrap() >= 0.0);
    }

    /// The interval is strictly ordered whenever the sample varies.
    #[test]
    fn confidence_interval_ordered(values in finite_values(2), level in prop::sample::select(vec![0.90, 0.95, 0.99])) {
        let sd = unbiased_std(&values).unwrap();
        prop_assume!(sd > 1e-6);
        let ci = confidence_interval(&values, level).unwrap().unwrap();
        prop_assert!(ci.lower < ci.upper);
        prop_assert!(ci.lower <= ci.mean && ci.mean <= ci.upper);
    }

    /// The trimmed mean stays within the sample range.
    #[test]
    fn trimmed_mean_within_range(values in finite_values(1), frac in 0.0..0.49f64) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if let Some(tm) = trimmed_mean(&values, frac).unwrap() {
            prop_assert!(tm >= min - TOL * min.abs().max(1.0));
            prop_assert!(tm <= max + TOL * max.abs().max(1.0));
        }
        let m = mean(&values).unwrap();
        prop_assert!(m.is_finite());
    }

    /// Outlier indices are valid and unique.
    #[test]
    fn outlier_indices_valid(values in finite_values(4)) {
        let flagged = detect_outliers(&values, 1.5).unwrap().unwrap();
        prop_assert!(flagged.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(flagged.iter().all(|&i| i < values.len()));
    }
}
