//! Typed analysis configuration.
//!
//! Every field has a built-in default and every struct is `#[serde(default)]`,
//! so a config file only needs the keys it overrides.
//!
//! Several defaults (seasonal variance cutoffs, the trend slope cutoff, the
//! CUSUM multiplier, the EWMA deviation fraction) are heuristics without an
//! empirical derivation. They live here, named, so they can be inspected
//! and tuned per deployment.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Schema version for compatibility checking.
    pub schema_version: String,

    /// Fewer events than this yields the insufficient-data recommendation.
    pub minimum_data_points: usize,

    /// Exponential percentile used as the base interval (e.g. 0.95).
    pub analysis_confidence_level: f64,

    /// KS p-value below which the recent distribution counts as shifted.
    pub change_detection_threshold: f64,

    /// Minimum events before periodicity is classified.
    pub seasonal_analysis_minimum_points: usize,

    /// Only the most recent `event_cap` events are analysed.
    pub event_cap: usize,

    /// Interval returned when there is not enough data (seconds).
    pub fallback_interval_secs: f64,

    /// Look-back window for the real-time "recent activity" count (seconds).
    pub recent_activity_window_secs: f64,

    /// Tukey fence multiplier for inter-arrival outlier diagnostics.
    pub iqr_multiplier: f64,

    pub change_point: ChangePointSettings,
    pub goodness_of_fit: GoodnessOfFitSettings,
    pub seasonal: SeasonalSettings,
    pub trend: TrendSettings,
    pub thresholds: ThresholdSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            minimum_data_points: 50,
            analysis_confidence_level: 0.95,
            change_detection_threshold: 0.05,
            seasonal_analysis_minimum_points: 20,
            event_cap: 10_000,
            fallback_interval_secs: 3600.0,
            recent_activity_window_secs: 3600.0,
            iqr_multiplier: 1.5,
            change_point: ChangePointSettings::default(),
            goodness_of_fit: GoodnessOfFitSettings::default(),
            seasonal: SeasonalSettings::default(),
            trend: TrendSettings::default(),
            thresholds: ThresholdSettings::default(),
        }
    }
}

/// CUSUM / EWMA change-point detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangePointSettings {
    /// Width of each counting window (seconds).
    pub window_secs: f64,
    /// |S_i| must exceed `cusum_multiplier * std` to flag a window.
    pub cusum_multiplier: f64,
    /// EWMA smoothing factor α.
    pub ewma_alpha: f64,
    /// |ewma_i − mean| must exceed this fraction of the mean to flag.
    pub ewma_deviation_fraction: f64,
    /// Confidence for a window flagged by both detectors.
    pub both_confidence: f64,
    /// Confidence for a window flagged by a single detector.
    pub single_confidence: f64,
    /// Only the most recent `max_windows` windows are scanned.
    pub max_windows: usize,
}

impl Default for ChangePointSettings {
    fn default() -> Self {
        Self {
            window_secs: 3600.0,
            cusum_multiplier: 2.0,
            ewma_alpha: 0.3,
            ewma_deviation_fraction: 0.5,
            both_confidence: 0.9,
            single_confidence: 0.6,
            max_windows: 8_760,
        }
    }
}

/// Two-sample KS test settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoodnessOfFitSettings {
    /// Each half needs at least this many inter-arrival samples.
    pub min_samples_per_half: usize,
}

impl Default for GoodnessOfFitSettings {
    fn default() -> Self {
        Self {
            min_samples_per_half: 10,
        }
    }
}

/// Periodicity classification cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalSettings {
    pub hourly_variance_cutoff: f64,
    pub daily_variance_cutoff: f64,
    pub monthly_variance_cutoff: f64,
    /// Full cycles of a period the data must span before it is eligible.
    pub min_cycles: f64,
}

impl Default for SeasonalSettings {
    fn default() -> Self {
        Self {
            hourly_variance_cutoff: 0.5,
            daily_variance_cutoff: 0.3,
            monthly_variance_cutoff: 0.2,
            min_cycles: 2.0,
        }
    }
}

/// Trend regression settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    /// Width of each counting window (seconds).
    pub window_secs: f64,
    /// |slope| must exceed this to call a direction.
    pub slope_cutoff: f64,
    /// R² above which the coarse p-value drops to 0.01.
    pub r_squared_cutoff: f64,
    /// p-value below which the trend is significant.
    pub significance_level: f64,
    /// Only the most recent `max_windows` windows are regressed.
    pub max_windows: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            window_secs: 86_400.0,
            slope_cutoff: 0.1,
            r_squared_cutoff: 0.5,
            significance_level: 0.05,
            max_windows: 3_650,
        }
    }
}

/// Percentile multipliers for adaptive interval bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSettings {
    /// Applied to the 75th inter-arrival percentile.
    pub conservative_factor: f64,
    /// Applied to the median inter-arrival time.
    pub moderate_factor: f64,
    /// Applied to the 25th inter-arrival percentile.
    pub aggressive_factor: f64,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            conservative_factor: 0.8,
            moderate_factor: 1.2,
            aggressive_factor: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = AnalysisConfig::default();
        assert_eq!(c.minimum_data_points, 50);
        assert_eq!(c.analysis_confidence_level, 0.95);
        assert_eq!(c.change_detection_threshold, 0.05);
        assert_eq!(c.seasonal_analysis_minimum_points, 20);
        assert_eq!(c.change_point.cusum_multiplier, 2.0);
        assert_eq!(c.change_point.ewma_alpha, 0.3);
        assert_eq!(c.iqr_multiplier, 1.5);
        assert_eq!(c.event_cap, 10_000);
        assert_eq!(c.change_point.max_windows, 8_760);
        assert_eq!(c.trend.max_windows, 3_650);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: AnalysisConfig =
            serde_json::from_str(r#"{"minimum_data_points": 80, "trend": {"slope_cutoff": 0.2}}"#)
                .unwrap();
        assert_eq!(c.minimum_data_points, 80);
        assert_eq!(c.trend.slope_cutoff, 0.2);
        assert_eq!(c.trend.window_secs, 86_400.0);
        assert_eq!(c.change_point, ChangePointSettings::default());
    }
}
