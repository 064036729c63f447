//! The analysis pipeline: one snapshot in, one report out.
//!
//! ```text
//! EventSnapshot ─┬─ PoissonProcessModel ──┬─ AdaptiveThresholdCalculator ─┐
//!                │                        └─ GoodnessOfFitTester ─────────┤
//!                ├─ ChangePointDetector ──────────────────────────────────┤
//!                ├─ SeasonalAnalyzer (Poisson seasonal profile) ──────────┼─ RecommendationCombiner
//!                └─ TrendAnalyzer ────────────────────────────────────────┘
//! ```
//!
//! Every stage is a pure function of the snapshot and the configuration, so
//! the same input always produces the same report.

use bc_common::EventSnapshot;
use bc_config::{validate_config, AnalysisConfig, ValidationError};
use bc_math::{ConfidenceInterval, ThresholdSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::decision::{
    AdaptiveThresholdCalculator, AdaptiveThresholds, Adjustments, CombinerInput, Recommendation,
    RecommendationCombiner,
};
use crate::inference::{
    ChangePointAnalysis, ChangePointDetector, GoodnessOfFitResult, GoodnessOfFitTester,
    PoissonFit, PoissonProcessModel, SeasonalAnalyzer, SeasonalResult, TrendAnalyzer, TrendResult,
};
use crate::logging::{event_names, Stage};

const TRIM_FRACTION: f64 = 0.1;

/// Descriptive statistics reported alongside the recommendation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Indices (into the inter-arrival series) outside the Tukey fences.
    pub interarrival_outliers: Option<Vec<usize>>,
    /// Confidence interval for the mean gap at the configured level.
    pub interarrival_ci: Option<ConfidenceInterval>,
    pub median_interarrival_secs: Option<f64>,
    /// Mean gap with the top and bottom 10% removed.
    pub trimmed_mean_interarrival_secs: Option<f64>,
    pub interarrival_range_secs: Option<f64>,
    /// Rare / sometimes / often opening lengths in minutes.
    pub duration_thresholds: Option<ThresholdSet>,
}

impl Diagnostics {
    fn compute(snapshot: &EventSnapshot, interarrivals: &[f64], config: &AnalysisConfig) -> Self {
        let interarrival_ci =
            match bc_math::confidence_interval(interarrivals, config.analysis_confidence_level) {
                Ok(ci) => ci,
                Err(err) => {
                    debug!(%err, "skipping inter-arrival confidence interval");
                    None
                }
            };
        let durations: Vec<f64> = snapshot
            .events()
            .iter()
            .filter_map(|e| e.duration_minutes())
            .filter(|d| *d >= 0.0)
            .collect();

        Self {
            interarrival_outliers: bc_math::detect_outliers(interarrivals, config.iqr_multiplier)
                .ok()
                .flatten(),
            interarrival_ci,
            median_interarrival_secs: bc_math::median(interarrivals),
            trimmed_mean_interarrival_secs: bc_math::trimmed_mean(interarrivals, TRIM_FRACTION)
                .ok()
                .flatten(),
            interarrival_range_secs: bc_math::range(interarrivals),
            duration_thresholds: bc_math::data_driven_thresholds(&durations),
        }
    }
}

/// Full per-run breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub event_count: usize,
    pub recommendation: Recommendation,
    pub poisson: PoissonFit,
    pub thresholds: Option<AdaptiveThresholds>,
    pub change_points: ChangePointAnalysis,
    pub goodness_of_fit: GoodnessOfFitResult,
    pub seasonal: SeasonalResult,
    pub trend: TrendResult,
    /// Present when the combiner ran (enough data and a defined base interval).
    pub base_interval_secs: Option<f64>,
    pub adjustments: Option<Adjustments>,
    pub diagnostics: Diagnostics,
}

impl AnalysisReport {
    pub fn is_insufficient(&self) -> bool {
        self.base_interval_secs.is_none()
    }
}

/// Runs every sub-analysis and fuses the results.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    poisson: PoissonProcessModel,
    change_points: ChangePointDetector,
    goodness_of_fit: GoodnessOfFitTester,
    seasonal: SeasonalAnalyzer,
    trend: TrendAnalyzer,
    thresholds: AdaptiveThresholdCalculator,
    combiner: RecommendationCombiner,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self, ValidationError> {
        validate_config(&config)?;
        Ok(Self {
            poisson: PoissonProcessModel::new(),
            change_points: ChangePointDetector::new(config.change_point.clone()),
            goodness_of_fit: GoodnessOfFitTester::new(
                config.goodness_of_fit.clone(),
                config.change_detection_threshold,
            ),
            seasonal: SeasonalAnalyzer::new(
                config.seasonal.clone(),
                config.seasonal_analysis_minimum_points,
            ),
            trend: TrendAnalyzer::new(config.trend.clone()),
            thresholds: AdaptiveThresholdCalculator::new(config.thresholds.clone()),
            combiner: RecommendationCombiner::new(
                config.analysis_confidence_level,
                config.minimum_data_points,
                config.fallback_interval_secs,
            ),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, snapshot: &EventSnapshot) -> AnalysisReport {
        let event_count = snapshot.len();
        info!(
            event = event_names::ANALYSIS_STARTED,
            stage = %Stage::Infer,
            events = event_count,
            "starting analysis"
        );

        let poisson = self.poisson.fit(snapshot);
        let change_points = self.change_points.detect(snapshot);
        let goodness_of_fit = self.goodness_of_fit.test_interarrivals(&poisson.interarrivals);
        let seasonal = self.seasonal.analyze(snapshot, &poisson.seasonal);
        let trend = self.trend.analyze(snapshot);
        let thresholds = self.thresholds.calculate(&poisson.interarrivals);
        let diagnostics = Diagnostics::compute(snapshot, &poisson.interarrivals, &self.config);
        debug!(
            event = event_names::INFER_FINISHED,
            stage = %Stage::Infer,
            rate_per_hour = ?poisson.rate_per_hour,
            change_points = change_points.change_points.len(),
            ks_p_value = goodness_of_fit.p_value,
            seasonal = %seasonal.pattern,
            trend = %trend.direction,
            "sub-analyses finished"
        );

        let combined = self.combiner.combine(&CombinerInput {
            event_count,
            fit: &poisson,
            thresholds: thresholds.as_ref(),
            change_points: &change_points,
            goodness_of_fit: &goodness_of_fit,
            seasonal: &seasonal,
            trend: &trend,
        });

        let (recommendation, base_interval_secs, adjustments) = match combined {
            Some(c) => {
                debug!(
                    event = event_names::DECIDE_RECOMMENDED,
                    stage = %Stage::Decide,
                    base_interval_secs = c.base_interval_secs,
                    adjustment = c.adjustments.product(),
                    adjusted_interval_secs = c.adjusted_interval_secs,
                    interval_secs = c.recommendation.interval_secs,
                    "recommendation fused"
                );
                (c.recommendation, Some(c.base_interval_secs), Some(c.adjustments))
            }
            None => {
                info!(
                    event = event_names::ANALYSIS_INSUFFICIENT_DATA,
                    stage = %Stage::Decide,
                    events = event_count,
                    minimum = self.config.minimum_data_points,
                    "not enough data, using fallback interval"
                );
                (self.combiner.fallback(event_count), None, None)
            }
        };

        info!(
            event = event_names::ANALYSIS_FINISHED,
            stage = %Stage::Decide,
            interval_secs = recommendation.interval_secs,
            confidence = recommendation.confidence,
            method = %recommendation.method,
            "analysis finished"
        );

        AnalysisReport {
            event_count,
            recommendation,
            poisson,
            thresholds,
            change_points,
            goodness_of_fit,
            seasonal,
            trend,
            base_interval_secs,
            adjustments,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::RecommendationMethod;
    use bc_common::Event;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn hourly(n: i64) -> EventSnapshot {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        EventSnapshot::new(
            (0..n)
                .map(|i| {
                    let open = base + TimeDelta::hours(i);
                    Event::new(format!("e{i}"), open).closed_at(open + TimeDelta::minutes(8 + i % 5))
                })
                .collect(),
        )
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.analysis_confidence_level = 1.0;
        assert!(Analyzer::new(config).is_err());
    }

    #[test]
    fn report_is_deterministic() {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let snap = hourly(80);
        assert_eq!(analyzer.analyze(&snap), analyzer.analyze(&snap));
    }

    #[test]
    fn diagnostics_are_populated() {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let report = analyzer.analyze(&hourly(60));
        let d = &report.diagnostics;
        assert_eq!(d.interarrival_outliers, Some(vec![]));
        assert_eq!(d.median_interarrival_secs, Some(3600.0));
        assert_eq!(d.interarrival_range_secs, Some(0.0));
        let ci = d.interarrival_ci.unwrap();
        assert_eq!(ci.lower, ci.upper);
        let durations = d.duration_thresholds.unwrap();
        assert!(durations.rare <= durations.often);
        assert!(durations.rare >= 8.0 && durations.often <= 12.0);
    }

    #[test]
    fn unsupported_ci_level_is_skipped() {
        let config = AnalysisConfig {
            analysis_confidence_level: 0.8,
            ..AnalysisConfig::default()
        };
        let report = Analyzer::new(config).unwrap().analyze(&hourly(60));
        assert!(report.diagnostics.interarrival_ci.is_none());
        assert_eq!(report.recommendation.method, RecommendationMethod::PoissonProcess);
    }

    #[test]
    fn insufficient_report_keeps_breakdown() {
        let report = Analyzer::new(AnalysisConfig::default())
            .unwrap()
            .analyze(&hourly(10));
        assert!(report.is_insufficient());
        assert!(report.adjustments.is_none());
        assert_eq!(report.poisson.event_count, 10);
        assert_eq!(
            report.recommendation.method,
            RecommendationMethod::InsufficientData
        );
    }

    #[test]
    fn identical_timestamps_fall_back() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let snap = EventSnapshot::new((0..60).map(|i| Event::new(format!("e{i}"), t)).collect());
        let report = Analyzer::new(AnalysisConfig::default()).unwrap().analyze(&snap);
        assert_eq!(report.recommendation.confidence, 0.0);
        assert_eq!(report.recommendation.interval_secs, 3600.0);
    }
}
