//! Two-sample Kolmogorov–Smirnov test on inter-arrival times.
//!
//! The inter-arrival series is split at its midpoint into a historical
//! half and a recent half. A small p-value means the recent gaps no longer
//! look like they come from the historical distribution.
//!
//! The p-value uses the leading term of the asymptotic Kolmogorov series,
//! `p ≈ 2·exp(−2·n_eff·D²)` with `n_eff = n1·n2/(n1+n2)`, clamped to [0, 1].

use bc_config::GoodnessOfFitSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodnessOfFitResult {
    /// KS statistic D; zero when the test was skipped.
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
    pub historical_samples: usize,
    pub recent_samples: usize,
}

impl GoodnessOfFitResult {
    fn skipped(historical_samples: usize, recent_samples: usize) -> Self {
        Self {
            statistic: 0.0,
            p_value: 1.0,
            significant: false,
            historical_samples,
            recent_samples,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoodnessOfFitTester {
    settings: GoodnessOfFitSettings,
    significance_level: f64,
}

impl GoodnessOfFitTester {
    pub fn new(settings: GoodnessOfFitSettings, significance_level: f64) -> Self {
        Self {
            settings,
            significance_level,
        }
    }

    /// Compare the first and second halves of an inter-arrival series.
    pub fn test_interarrivals(&self, interarrivals: &[f64]) -> GoodnessOfFitResult {
        let mid = interarrivals.len() / 2;
        let (historical, recent) = interarrivals.split_at(mid);
        self.test_samples(historical, recent)
    }

    /// Compare two arbitrary samples.
    pub fn test_samples(&self, a: &[f64], b: &[f64]) -> GoodnessOfFitResult {
        let min = self.settings.min_samples_per_half;
        if a.len() < min || b.len() < min || a.is_empty() || b.is_empty() {
            return GoodnessOfFitResult::skipped(a.len(), b.len());
        }
        let statistic = ks_statistic(a, b);
        let (n1, n2) = (a.len() as f64, b.len() as f64);
        let n_eff = n1 * n2 / (n1 + n2);
        let p_value = (2.0 * (-2.0 * n_eff * statistic * statistic).exp()).clamp(0.0, 1.0);
        GoodnessOfFitResult {
            statistic,
            p_value,
            significant: p_value < self.significance_level,
            historical_samples: a.len(),
            recent_samples: b.len(),
        }
    }
}

impl Default for GoodnessOfFitTester {
    fn default() -> Self {
        Self::new(GoodnessOfFitSettings::default(), 0.05)
    }
}

/// Largest vertical distance between the two empirical CDFs.
///
/// Evaluated at every point of the merged support; ties advance both
/// samples together.
pub fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut xs = a.to_vec();
    let mut ys = b.to_vec();
    xs.sort_by(f64::total_cmp);
    ys.sort_by(f64::total_cmp);
    let (n1, n2) = (xs.len() as f64, ys.len() as f64);

    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;
    while i < xs.len() && j < ys.len() {
        let v = xs[i].min(ys[j]);
        while i < xs.len() && xs[i] <= v {
            i += 1;
        }
        while j < ys.len() && ys[j] <= v {
            j += 1;
        }
        d = d.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    d
}
