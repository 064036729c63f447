//! Rate change detection over windowed opening counts.
//!
//! Two complementary detectors run over the same count series:
//!
//! - **CUSUM**: cumulative sum of standardized deviations
//!   `S_i = Σ (x_k − μ)/σ`. A window is flagged when `|S_i| > h·σ`.
//!   Slow drifts accumulate until they cross the threshold.
//! - **EWMA**: exponentially weighted moving average seeded with `x_0`,
//!   `e_i = α·x_i + (1−α)·e_{i−1}`. A window is flagged when
//!   `|e_i − μ| > f·μ`. Reacts to sustained level shifts.
//!
//! Windows flagged by both detectors are reported with higher confidence.

use bc_common::EventSnapshot;
use bc_config::ChangePointSettings;
use serde::{Deserialize, Serialize};

use crate::window::{bin_timestamps, counts};

const SECS_PER_DAY: f64 = 86_400.0;

/// Which detector(s) flagged a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Cusum,
    Ewma,
    Both,
}

/// A window where the opening rate appears to shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    pub window_index: usize,
    pub confidence: f64,
    pub method: DetectionMethod,
}

/// Output of one detection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePointAnalysis {
    /// Merged change points, ordered by window index.
    pub change_points: Vec<ChangePoint>,
    pub cusum_flags: Vec<usize>,
    pub ewma_flags: Vec<usize>,
    pub window_count: usize,
    /// Change points per day of binned coverage.
    pub rate_per_day: f64,
}

impl ChangePointAnalysis {
    fn empty() -> Self {
        Self {
            change_points: Vec::new(),
            cusum_flags: Vec::new(),
            ewma_flags: Vec::new(),
            window_count: 0,
            rate_per_day: 0.0,
        }
    }
}

/// CUSUM + EWMA detector.
#[derive(Debug, Clone)]
pub struct ChangePointDetector {
    settings: ChangePointSettings,
}

impl ChangePointDetector {
    pub fn new(settings: ChangePointSettings) -> Self {
        Self { settings }
    }

    /// Bin the snapshot into fixed windows and detect shifts in the counts.
    pub fn detect(&self, snapshot: &EventSnapshot) -> ChangePointAnalysis {
        let windows = bin_timestamps(
            &snapshot.open_epoch_secs(),
            self.settings.window_secs,
            self.settings.max_windows,
        );
        self.detect_in_counts(&counts(&windows))
    }

    /// Detect shifts in an already-binned count series.
    pub fn detect_in_counts(&self, series: &[f64]) -> ChangePointAnalysis {
        if series.is_empty() {
            return ChangePointAnalysis::empty();
        }
        let cusum_flags = self.cusum(series);
        let ewma_flags = self.ewma(series);
        let change_points = self.merge(&cusum_flags, &ewma_flags);

        let covered_days = series.len() as f64 * self.settings.window_secs / SECS_PER_DAY;
        let rate_per_day = if covered_days > 0.0 {
            change_points.len() as f64 / covered_days
        } else {
            0.0
        };

        ChangePointAnalysis {
            change_points,
            cusum_flags,
            ewma_flags,
            window_count: series.len(),
            rate_per_day,
        }
    }

    fn cusum(&self, series: &[f64]) -> Vec<usize> {
        let (Some(mean), Some(std)) = (bc_math::mean(series), bc_math::unbiased_std(series))
        else {
            return Vec::new();
        };
        if std <= f64::EPSILON {
            return Vec::new();
        }
        let threshold = self.settings.cusum_multiplier * std;
        let mut sum = 0.0;
        let mut flags = Vec::new();
        for (i, &x) in series.iter().enumerate() {
            sum += (x - mean) / std;
            if sum.abs() > threshold {
                flags.push(i);
            }
        }
        flags
    }

    fn ewma(&self, series: &[f64]) -> Vec<usize> {
        let Some(mean) = bc_math::mean(series) else {
            return Vec::new();
        };
        if mean <= 0.0 {
            return Vec::new();
        }
        let alpha = self.settings.ewma_alpha;
        let limit = self.settings.ewma_deviation_fraction * mean;
        let mut ewma = series[0];
        let mut flags = Vec::new();
        for (i, &x) in series.iter().enumerate() {
            if i > 0 {
                ewma = alpha * x + (1.0 - alpha) * ewma;
            }
            if (ewma - mean).abs() > limit {
                flags.push(i);
            }
        }
        flags
    }

    fn merge(&self, cusum: &[usize], ewma: &[usize]) -> Vec<ChangePoint> {
        let mut indices: Vec<usize> = cusum.iter().chain(ewma.iter()).copied().collect();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .map(|window_index| {
                let in_cusum = cusum.binary_search(&window_index).is_ok();
                let in_ewma = ewma.binary_search(&window_index).is_ok();
                let (method, confidence) = match (in_cusum, in_ewma) {
                    (true, true) => (DetectionMethod::Both, self.settings.both_confidence),
                    (true, false) => (DetectionMethod::Cusum, self.settings.single_confidence),
                    _ => (DetectionMethod::Ewma, self.settings.single_confidence),
                };
                ChangePoint {
                    window_index,
                    confidence,
                    method,
                }
            })
            .collect()
    }
}

impl Default for ChangePointDetector {
    fn default() -> Self {
        Self::new(ChangePointSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_series(before: usize, after: usize, low: f64, high: f64) -> Vec<f64> {
        std::iter::repeat(low)
            .take(before)
            .chain(std::iter::repeat(high).take(after))
            .collect()
    }

    #[test]
    fn test_constant_series_has_no_flags() {
        let analysis = ChangePointDetector::default().detect_in_counts(&[3.0; 48]);
        assert!(analysis.change_points.is_empty());
        assert!(analysis.cusum_flags.is_empty());
        assert!(analysis.ewma_flags.is_empty());
        assert_eq!(analysis.window_count, 48);
        assert_eq!(analysis.rate_per_day, 0.0);
    }

    #[test]
    fn test_all_zero_series_has_no_flags() {
        let analysis = ChangePointDetector::default().detect_in_counts(&[0.0; 10]);
        assert!(analysis.change_points.is_empty());
    }

    #[test]
    fn test_step_change_flagged_near_boundary() {
        let series = step_series(24, 24, 1.0, 5.0);
        let analysis = ChangePointDetector::default().detect_in_counts(&series);
        assert!(!analysis.change_points.is_empty());
        assert!(analysis
            .change_points
            .iter()
            .any(|cp| (23..=25).contains(&cp.window_index)));
    }

    #[test]
    fn test_merge_assigns_confidence_by_agreement() {
        let detector = ChangePointDetector::default();
        let merged = detector.merge(&[2, 5], &[5, 7]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].method, DetectionMethod::Cusum);
        assert_eq!(merged[0].confidence, 0.6);
        assert_eq!(merged[1].method, DetectionMethod::Both);
        assert_eq!(merged[1].confidence, 0.9);
        assert_eq!(merged[2].method, DetectionMethod::Ewma);
    }

    #[test]
    fn test_rate_per_day_uses_binned_coverage() {
        let series = step_series(24, 24, 1.0, 5.0);
        let analysis = ChangePointDetector::default().detect_in_counts(&series);
        let expected = analysis.change_points.len() as f64 / 2.0;
        assert!((analysis.rate_per_day - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series() {
        let analysis = ChangePointDetector::default().detect_in_counts(&[]);
        assert_eq!(analysis.window_count, 0);
        assert!(analysis.change_points.is_empty());
    }
}
