//! Service facade: caps input, runs the pipeline, and caches the last state.
//!
//! The cached [`AnalysisState`] lives behind `RwLock<Arc<_>>`. A run builds
//! a complete new state and swaps the pointer in one write, so readers see
//! either the previous state or the new one and never a mix.

use std::sync::{Arc, RwLock};

use bc_common::{Event, EventSnapshot};
use bc_config::{AnalysisConfig, ValidationError};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{AnalysisReport, Analyzer};
use crate::decision::{Recommendation, RecommendationMethod};
use crate::inference::{SeasonalPattern, TrendDirection};
use crate::logging::{event_names, Stage};

const OPEN_WEIGHT: f64 = 0.2;
const RECENT_WEIGHT: f64 = 0.1;
const UNCERTAINTY_WEIGHT: f64 = 0.3;
const INSTABILITY_WEIGHT: f64 = 0.2;

/// How old the newest event is relative to the recommended interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFreshness {
    #[default]
    Unknown,
    VeryFresh,
    Fresh,
    Stale,
    VeryStale,
}

impl DataFreshness {
    /// Classify `age_secs` against `interval_secs` (≤1×, ≤2×, ≤4×, beyond).
    pub fn classify(age_secs: f64, interval_secs: f64) -> Self {
        if !(interval_secs > 0.0) {
            return DataFreshness::Unknown;
        }
        let ratio = age_secs.max(0.0) / interval_secs;
        if ratio <= 1.0 {
            DataFreshness::VeryFresh
        } else if ratio <= 2.0 {
            DataFreshness::Fresh
        } else if ratio <= 4.0 {
            DataFreshness::Stale
        } else {
            DataFreshness::VeryStale
        }
    }
}

/// How often the opening rate shifts, from the change-point rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternStability {
    #[default]
    Unknown,
    VeryStable,
    Stable,
    Unstable,
    VeryUnstable,
}

impl PatternStability {
    pub fn from_change_rate(rate_per_day: f64) -> Self {
        if rate_per_day < 0.05 {
            PatternStability::VeryStable
        } else if rate_per_day < 0.2 {
            PatternStability::Stable
        } else if rate_per_day <= 0.5 {
            PatternStability::Unstable
        } else {
            PatternStability::VeryUnstable
        }
    }

    pub fn is_unstable(self) -> bool {
        matches!(self, PatternStability::Unstable | PatternStability::VeryUnstable)
    }
}

/// Display-oriented snapshot of the most recent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisState {
    pub recommended_interval_secs: f64,
    pub confidence: f64,
    pub method: RecommendationMethod,
    pub data_freshness: DataFreshness,
    pub pattern_stability: PatternStability,
    pub seasonal_pattern: SeasonalPattern,
    pub trend_direction: TrendDirection,
    /// When the state was produced; `None` before the first run.
    pub updated_at: Option<DateTime<Utc>>,
}

impl AnalysisState {
    /// State shown before any analysis has run.
    pub fn initial(fallback_interval_secs: f64) -> Self {
        Self {
            recommended_interval_secs: fallback_interval_secs,
            confidence: 0.0,
            method: RecommendationMethod::InsufficientData,
            data_freshness: DataFreshness::Unknown,
            pattern_stability: PatternStability::Unknown,
            seasonal_pattern: SeasonalPattern::None,
            trend_direction: TrendDirection::Stable,
            updated_at: None,
        }
    }

    fn from_report(report: &AnalysisReport, snapshot: &EventSnapshot, now: DateTime<Utc>) -> Self {
        let rec = &report.recommendation;
        let data_freshness = match snapshot.latest_open() {
            Some(latest) => {
                let age_secs = (now - latest).num_milliseconds() as f64 / 1000.0;
                DataFreshness::classify(age_secs, rec.interval_secs)
            }
            None => DataFreshness::Unknown,
        };
        let pattern_stability = if report.is_insufficient() {
            PatternStability::Unknown
        } else {
            PatternStability::from_change_rate(report.change_points.rate_per_day)
        };
        Self {
            recommended_interval_secs: rec.interval_secs,
            confidence: rec.confidence,
            method: rec.method,
            data_freshness,
            pattern_stability,
            seasonal_pattern: report.seasonal.pattern,
            trend_direction: report.trend.direction,
            updated_at: Some(now),
        }
    }
}

/// Recommendation plus live counters for "what's happening right now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTimeAnalysis {
    pub recommendation: Recommendation,
    /// Events with no close time yet.
    pub open_count: usize,
    /// Openings inside the recent-activity window.
    pub recent_activity_count: usize,
    /// 0–1 score of how urgently the client should refresh.
    pub urgency_score: f64,
}

/// Weighted, clamped urgency score.
pub fn urgency_score(
    open_count: usize,
    recent_activity_count: usize,
    confidence: f64,
    unstable: bool,
) -> f64 {
    let instability = if unstable { 1.0 } else { 0.0 };
    (OPEN_WEIGHT * open_count as f64
        + RECENT_WEIGHT * recent_activity_count as f64
        + UNCERTAINTY_WEIGHT * (1.0 - confidence)
        + INSTABILITY_WEIGHT * instability)
        .clamp(0.0, 1.0)
}

/// Result of one service run.
#[derive(Debug, Clone)]
pub struct ServiceRun {
    pub report: AnalysisReport,
    pub state: Arc<AnalysisState>,
    /// Number of events dropped by the event cap.
    pub truncated: usize,
}

pub struct AnalysisService {
    analyzer: Analyzer,
    state: RwLock<Arc<AnalysisState>>,
}

impl AnalysisService {
    pub fn new(config: AnalysisConfig) -> Result<Self, ValidationError> {
        let initial = AnalysisState::initial(config.fallback_interval_secs);
        Ok(Self {
            analyzer: Analyzer::new(config)?,
            state: RwLock::new(Arc::new(initial)),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.analyzer.config()
    }

    /// Analyze a batch and return only the recommendation.
    pub fn analyze(&self, events: &[Event]) -> Recommendation {
        self.run(events, Utc::now()).report.recommendation
    }

    /// Analyze a batch as of `now`, replace the cached state, and return
    /// the full breakdown.
    pub fn run(&self, events: &[Event], now: DateTime<Utc>) -> ServiceRun {
        let (snapshot, truncated) = self.prepare(events);
        self.run_snapshot(&snapshot, truncated, now)
    }

    fn run_snapshot(
        &self,
        snapshot: &EventSnapshot,
        truncated: usize,
        now: DateTime<Utc>,
    ) -> ServiceRun {
        let report = self.analyzer.analyze(snapshot);
        let state = Arc::new(AnalysisState::from_report(&report, snapshot, now));
        self.replace_state(Arc::clone(&state));
        ServiceRun {
            report,
            state,
            truncated,
        }
    }

    /// Last published state, or the initial state before any run.
    pub fn current_state(&self) -> Arc<AnalysisState> {
        let guard = self.state.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn perform_real_time_analysis(&self, events: &[Event]) -> RealTimeAnalysis {
        self.perform_real_time_analysis_at(events, Utc::now())
    }

    pub fn perform_real_time_analysis_at(
        &self,
        events: &[Event],
        now: DateTime<Utc>,
    ) -> RealTimeAnalysis {
        let (snapshot, truncated) = self.prepare(events);
        let run = self.run_snapshot(&snapshot, truncated, now);
        let window = TimeDelta::try_milliseconds(
            (self.config().recent_activity_window_secs * 1000.0).round() as i64,
        )
        .unwrap_or(TimeDelta::MAX);
        let open_count = snapshot.open_count();
        let recent_activity_count = snapshot.recent_count(now, window);
        let urgency = urgency_score(
            open_count,
            recent_activity_count,
            run.report.recommendation.confidence,
            run.state.pattern_stability.is_unstable(),
        );
        info!(
            event = event_names::REALTIME_SCORED,
            stage = %Stage::Publish,
            open_count,
            recent_activity_count,
            urgency,
            "real-time analysis scored"
        );
        RealTimeAnalysis {
            recommendation: run.report.recommendation,
            open_count,
            recent_activity_count,
            urgency_score: urgency,
        }
    }

    fn prepare(&self, events: &[Event]) -> (EventSnapshot, usize) {
        let cap = self.config().event_cap;
        let snapshot = EventSnapshot::from_slice(events);
        let truncated = snapshot.len().saturating_sub(cap);
        if truncated > 0 {
            info!(
                event = event_names::INGEST_TRUNCATED,
                stage = %Stage::Ingest,
                total = snapshot.len(),
                cap,
                dropped = truncated,
                "keeping only the most recent events"
            );
        }
        (snapshot.most_recent(cap), truncated)
    }

    fn replace_state(&self, state: Arc<AnalysisState>) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        *guard = state;
        debug!(
            event = event_names::STATE_REPLACED,
            stage = %Stage::Publish,
            interval_secs = guard.recommended_interval_secs,
            "cached analysis state replaced"
        );
    }
}
