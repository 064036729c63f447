//! Long-run trend in opening activity via least squares over window counts.
//!
//! The slope is expressed per second of elapsed time (x is the window start
//! offset), so with daily windows the default slope cutoff of 0.1 is only
//! crossed by very steep changes. The p-value is a coarse two-level proxy
//! driven by R², not a t-test.

use bc_common::EventSnapshot;
use bc_config::TrendSettings;
use bc_math::LinearFit;
use serde::{Deserialize, Serialize};

use crate::window::{bin_timestamps, counts};

const STRONG_FIT_P_VALUE: f64 = 0.01;
const WEAK_FIT_P_VALUE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub window_count: usize,
}

impl TrendResult {
    pub fn is_significant(&self) -> bool {
        self.direction != TrendDirection::Stable
    }

    fn flat(window_count: usize) -> Self {
        Self {
            direction: TrendDirection::Stable,
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
            p_value: 1.0,
            window_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    settings: TrendSettings,
}

impl TrendAnalyzer {
    pub fn new(settings: TrendSettings) -> Self {
        Self { settings }
    }

    pub fn analyze(&self, snapshot: &EventSnapshot) -> TrendResult {
        let windows = bin_timestamps(
            &snapshot.open_epoch_secs(),
            self.settings.window_secs,
            self.settings.max_windows,
        );
        self.fit_counts(&counts(&windows))
    }

    /// Regress counts on window offsets; fewer than two windows is stable.
    pub fn fit_counts(&self, series: &[f64]) -> TrendResult {
        let xs: Vec<f64> = (0..series.len())
            .map(|i| i as f64 * self.settings.window_secs)
            .collect();
        let Some(fit) = bc_math::linear_regression(&xs, series) else {
            return TrendResult::flat(series.len());
        };
        self.classify(&fit, series.len())
    }

    fn classify(&self, fit: &LinearFit, window_count: usize) -> TrendResult {
        let p_value = if fit.r_squared > self.settings.r_squared_cutoff {
            STRONG_FIT_P_VALUE
        } else {
            WEAK_FIT_P_VALUE
        };
        let significant = p_value < self.settings.significance_level;
        let direction = if significant && fit.slope > self.settings.slope_cutoff {
            TrendDirection::Increasing
        } else if significant && fit.slope < -self.settings.slope_cutoff {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };
        TrendResult {
            direction,
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            p_value,
            window_count,
        }
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new(TrendSettings::default())
    }
}
