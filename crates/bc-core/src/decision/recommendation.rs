//! Fusion of the sub-analyses into one refresh-interval recommendation.
//!
//! The Poisson percentile interval is the base. Each sub-analysis that
//! fires contributes a multiplicative adjustment, and the product is
//! clamped into the adaptive threshold bounds. Confidence starts from a
//! fixed base and earns bonuses for evidence that the model is sound.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::thresholds::AdaptiveThresholds;
use crate::inference::{
    ChangePointAnalysis, GoodnessOfFitResult, PoissonFit, SeasonalPattern, SeasonalResult,
    TrendDirection, TrendResult,
};

const HOURLY_SEASONAL_FACTOR: f64 = 0.8;
const DAILY_SEASONAL_FACTOR: f64 = 0.9;
const INCREASING_TREND_FACTOR: f64 = 0.7;
const DECREASING_TREND_FACTOR: f64 = 1.2;
const HIGH_CHANGE_RATE: f64 = 0.5;
const HIGH_CHANGE_FACTOR: f64 = 0.5;
const MODERATE_CHANGE_RATE: f64 = 0.2;
const MODERATE_CHANGE_FACTOR: f64 = 0.75;
const LOW_CHANGE_RATE: f64 = 0.05;
const LOW_CHANGE_FACTOR: f64 = 1.5;
const SHIFTED_DISTRIBUTION_FACTOR: f64 = 0.7;

const BASE_CONFIDENCE: f64 = 0.8;
const LARGE_SAMPLE_SIZE: usize = 100;
const LARGE_SAMPLE_BONUS: f64 = 0.1;
const EVIDENCE_BONUS: f64 = 0.05;
const STABLE_CHANGE_RATE: f64 = 0.1;
const PATTERN_CHANGE_POINTS: usize = 5;

/// How the interval was primarily derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMethod {
    InsufficientData,
    ChangeDetection,
    SeasonalAnalysis,
    TrendAnalysis,
    PatternAnalysis,
    PoissonProcess,
}

impl std::fmt::Display for RecommendationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecommendationMethod::InsufficientData => "insufficient_data",
            RecommendationMethod::ChangeDetection => "change_detection",
            RecommendationMethod::SeasonalAnalysis => "seasonal_analysis",
            RecommendationMethod::TrendAnalysis => "trend_analysis",
            RecommendationMethod::PatternAnalysis => "pattern_analysis",
            RecommendationMethod::PoissonProcess => "poisson_process",
        };
        f.write_str(s)
    }
}

/// The engine's answer: how often to refresh, and how sure it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub interval_secs: f64,
    pub confidence: f64,
    pub method: RecommendationMethod,
    pub reasoning: String,
}

impl Recommendation {
    /// Degraded answer for histories too short to model.
    pub fn insufficient_data(fallback_secs: f64, reasoning: impl Into<String>) -> Self {
        Self {
            interval_secs: fallback_secs,
            confidence: 0.0,
            method: RecommendationMethod::InsufficientData,
            reasoning: reasoning.into(),
        }
    }
}

/// Multiplicative factors applied to the base interval; 1.0 means "did not fire".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    pub seasonal: f64,
    pub trend: f64,
    pub change_point: f64,
    pub goodness_of_fit: f64,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            seasonal: 1.0,
            trend: 1.0,
            change_point: 1.0,
            goodness_of_fit: 1.0,
        }
    }
}

impl Adjustments {
    pub fn product(&self) -> f64 {
        self.seasonal * self.trend * self.change_point * self.goodness_of_fit
    }

    fn from_analyses(
        seasonal: &SeasonalResult,
        trend: &TrendResult,
        change_points: &ChangePointAnalysis,
        goodness_of_fit: &GoodnessOfFitResult,
    ) -> Self {
        let seasonal = match seasonal.pattern {
            SeasonalPattern::Hourly => HOURLY_SEASONAL_FACTOR,
            SeasonalPattern::Daily => DAILY_SEASONAL_FACTOR,
            _ => 1.0,
        };
        let trend = match trend.direction {
            TrendDirection::Increasing => INCREASING_TREND_FACTOR,
            TrendDirection::Decreasing => DECREASING_TREND_FACTOR,
            TrendDirection::Stable => 1.0,
        };
        let rate = change_points.rate_per_day;
        let change_point = if rate > HIGH_CHANGE_RATE {
            HIGH_CHANGE_FACTOR
        } else if rate > MODERATE_CHANGE_RATE {
            MODERATE_CHANGE_FACTOR
        } else if rate < LOW_CHANGE_RATE {
            LOW_CHANGE_FACTOR
        } else {
            1.0
        };
        let goodness_of_fit = if goodness_of_fit.significant {
            SHIFTED_DISTRIBUTION_FACTOR
        } else {
            1.0
        };
        Self {
            seasonal,
            trend,
            change_point,
            goodness_of_fit,
        }
    }
}

/// Everything the combiner looks at for one run.
#[derive(Debug, Clone, Copy)]
pub struct CombinerInput<'a> {
    pub event_count: usize,
    pub fit: &'a PoissonFit,
    pub thresholds: Option<&'a AdaptiveThresholds>,
    pub change_points: &'a ChangePointAnalysis,
    pub goodness_of_fit: &'a GoodnessOfFitResult,
    pub seasonal: &'a SeasonalResult,
    pub trend: &'a TrendResult,
}

/// A recommendation together with the factors that shaped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combined {
    pub recommendation: Recommendation,
    pub base_interval_secs: f64,
    pub adjustments: Adjustments,
    /// Interval before clamping into the threshold bounds.
    pub adjusted_interval_secs: f64,
}

#[derive(Debug, Clone)]
pub struct RecommendationCombiner {
    confidence_level: f64,
    minimum_data_points: usize,
    fallback_interval_secs: f64,
}

impl RecommendationCombiner {
    pub fn new(confidence_level: f64, minimum_data_points: usize, fallback_interval_secs: f64) -> Self {
        Self {
            confidence_level,
            minimum_data_points,
            fallback_interval_secs,
        }
    }

    pub fn fallback(&self, event_count: usize) -> Recommendation {
        Recommendation::insufficient_data(
            self.fallback_interval_secs,
            format!(
                "Only {event_count} events available; at least {} with distinct open times are \
                 needed to model the opening rate, using the default {:.0}s refresh interval.",
                self.minimum_data_points, self.fallback_interval_secs
            ),
        )
    }

    /// Combine the sub-analyses; `None` means the base interval or its
    /// bounds are undefined.
    pub fn combine(&self, input: &CombinerInput<'_>) -> Option<Combined> {
        if input.event_count < self.minimum_data_points {
            return None;
        }
        let base = input.fit.interval_at(self.confidence_level)?;
        // Any defined base implies at least one gap, hence thresholds.
        let thresholds = input.thresholds?;
        let adjustments = Adjustments::from_analyses(
            input.seasonal,
            input.trend,
            input.change_points,
            input.goodness_of_fit,
        );
        let adjusted = base * adjustments.product();
        let interval_secs = thresholds.clamp(adjusted);

        let recommendation = Recommendation {
            interval_secs,
            confidence: self.confidence(input),
            method: self.method(input),
            reasoning: self.reasoning(input, base, &adjustments, adjusted, interval_secs),
        };
        Some(Combined {
            recommendation,
            base_interval_secs: base,
            adjustments,
            adjusted_interval_secs: adjusted,
        })
    }

    fn confidence(&self, input: &CombinerInput<'_>) -> f64 {
        let mut confidence = BASE_CONFIDENCE;
        if input.event_count > LARGE_SAMPLE_SIZE {
            confidence += LARGE_SAMPLE_BONUS;
        }
        if !input.goodness_of_fit.significant {
            confidence += EVIDENCE_BONUS;
        }
        if input.seasonal.pattern.is_present() {
            confidence += EVIDENCE_BONUS;
        }
        if input.trend.is_significant() {
            confidence += EVIDENCE_BONUS;
        }
        if input.change_points.rate_per_day < STABLE_CHANGE_RATE {
            confidence += EVIDENCE_BONUS;
        }
        confidence.min(1.0)
    }

    fn method(&self, input: &CombinerInput<'_>) -> RecommendationMethod {
        if input.goodness_of_fit.significant {
            RecommendationMethod::ChangeDetection
        } else if input.seasonal.pattern.is_present() {
            RecommendationMethod::SeasonalAnalysis
        } else if input.trend.is_significant() {
            RecommendationMethod::TrendAnalysis
        } else if input.change_points.change_points.len() > PATTERN_CHANGE_POINTS {
            RecommendationMethod::PatternAnalysis
        } else {
            RecommendationMethod::PoissonProcess
        }
    }

    fn reasoning(
        &self,
        input: &CombinerInput<'_>,
        base: f64,
        adjustments: &Adjustments,
        adjusted: f64,
        interval: f64,
    ) -> String {
        let mut out = format!(
            "Poisson {:.0}th-percentile gap is {:.0}s over {} events",
            self.confidence_level * 100.0,
            base,
            input.event_count
        );
        if let Some(rate) = input.fit.rate_per_hour {
            let _ = write!(out, " ({rate:.2}/h)");
        }
        out.push('.');

        let mut factors = Vec::new();
        if adjustments.seasonal != 1.0 {
            factors.push(format!(
                "{} seasonality x{}",
                input.seasonal.pattern, adjustments.seasonal
            ));
        }
        if adjustments.trend != 1.0 {
            factors.push(format!(
                "{} trend (slope {:.3e}) x{}",
                input.trend.direction, input.trend.slope, adjustments.trend
            ));
        }
        if adjustments.change_point != 1.0 {
            factors.push(format!(
                "{:.2} change points/day x{}",
                input.change_points.rate_per_day, adjustments.change_point
            ));
        }
        if adjustments.goodness_of_fit != 1.0 {
            factors.push(format!(
                "recent gaps differ from history (KS p={:.3}) x{}",
                input.goodness_of_fit.p_value, adjustments.goodness_of_fit
            ));
        }
        if factors.is_empty() {
            out.push_str(" No adjustments applied.");
        } else {
            let _ = write!(out, " Adjusted for {}: {:.0}s.", factors.join(", "), adjusted);
        }

        if let Some(t) = input.thresholds {
            let (lo, hi) = t.bounds();
            if interval != adjusted {
                let _ = write!(out, " Clamped to [{lo:.0}s, {hi:.0}s] giving {interval:.0}s.");
            }
        }
        out
    }
}
