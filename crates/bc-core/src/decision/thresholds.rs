//! Interval bounds derived from the observed inter-arrival distribution.

use bc_config::ThresholdSettings;
use serde::{Deserialize, Serialize};

const TAIL_PERCENTILE: f64 = 0.95;

/// Candidate intervals plus the quantiles they were built from (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveThresholds {
    pub conservative_secs: f64,
    pub moderate_secs: f64,
    pub aggressive_secs: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl AdaptiveThresholds {
    /// `[min, max]` of the conservative and aggressive intervals.
    ///
    /// The factors are configurable, so either one can be the larger.
    pub fn bounds(&self) -> (f64, f64) {
        let lo = self.conservative_secs.min(self.aggressive_secs);
        let hi = self.conservative_secs.max(self.aggressive_secs);
        (lo, hi)
    }

    pub fn clamp(&self, interval_secs: f64) -> f64 {
        let (lo, hi) = self.bounds();
        interval_secs.clamp(lo, hi)
    }

    pub fn contains(&self, interval_secs: f64) -> bool {
        let (lo, hi) = self.bounds();
        (lo..=hi).contains(&interval_secs)
    }
}

#[derive(Debug, Clone)]
pub struct AdaptiveThresholdCalculator {
    settings: ThresholdSettings,
}

impl AdaptiveThresholdCalculator {
    pub fn new(settings: ThresholdSettings) -> Self {
        Self { settings }
    }

    /// Thresholds from inter-arrival gaps; `None` only when there are none.
    ///
    /// A single gap is enough: every percentile collapses onto it.
    pub fn calculate(&self, interarrivals: &[f64]) -> Option<AdaptiveThresholds> {
        let at = |p: f64| bc_math::percentile(interarrivals, p).ok().flatten();
        let (p25, p50, p75, p95) = (at(0.25)?, at(0.50)?, at(0.75)?, at(TAIL_PERCENTILE)?);
        Some(AdaptiveThresholds {
            conservative_secs: p75 * self.settings.conservative_factor,
            moderate_secs: p50 * self.settings.moderate_factor,
            aggressive_secs: p25 * self.settings.aggressive_factor,
            p25,
            p50,
            p75,
            p95,
        })
    }
}

impl Default for AdaptiveThresholdCalculator {
    fn default() -> Self {
        Self::new(ThresholdSettings::default())
    }
}
