//! Homogeneous Poisson process model for bridge-opening arrivals.
//!
//! # Model
//!
//! Openings are treated as a Poisson process with constant rate λ, so the
//! gaps between consecutive openings are iid `Exp(λ_exp)`:
//!
//! - `λ` (events/hour) = `N / span_hours`
//! - `λ_exp` (1/s) = `1 / mean(gap)` (maximum-likelihood fit)
//! - percentile gap for confidence `c`: `x_c = -ln(1 - c) / λ_exp`
//!
//! `x_c` is the wait after which a new opening has happened with
//! probability `c`, which is what the refresh interval is built on.
//!
//! The model also reports a relative-activity profile by hour of day,
//! weekday, and month. Each bucket's rate is `count / (total / buckets)`,
//! so a flat profile is all ones.

use bc_common::EventSnapshot;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// Confidence levels reported in every fit.
pub const PERCENTILE_LEVELS: [f64; 4] = [0.8, 0.9, 0.95, 0.99];

const SECS_PER_HOUR: f64 = 3600.0;

/// Gap length predicted at one confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileInterval {
    pub confidence: f64,
    pub interval_secs: f64,
}

/// Opening counts and relative rates per calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    /// Hour of day, 0–23 (UTC).
    pub hourly_counts: Vec<usize>,
    /// Weekday, Sunday first.
    pub weekday_counts: Vec<usize>,
    /// Month, January first.
    pub monthly_counts: Vec<usize>,
    pub hourly_rates: Vec<f64>,
    pub weekday_rates: Vec<f64>,
    pub monthly_rates: Vec<f64>,
}

impl SeasonalProfile {
    fn from_snapshot(snapshot: &EventSnapshot) -> Self {
        let mut hourly = vec![0usize; 24];
        let mut weekday = vec![0usize; 7];
        let mut monthly = vec![0usize; 12];
        for event in snapshot.events() {
            let t = event.open_time;
            hourly[t.hour() as usize] += 1;
            weekday[t.weekday().num_days_from_sunday() as usize] += 1;
            monthly[t.month0() as usize] += 1;
        }
        Self {
            hourly_rates: relative_rates(&hourly),
            weekday_rates: relative_rates(&weekday),
            monthly_rates: relative_rates(&monthly),
            hourly_counts: hourly,
            weekday_counts: weekday,
            monthly_counts: monthly,
        }
    }
}

/// `count / (total / bins)` per bucket; all zeros when there is no data.
pub fn relative_rates(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 || counts.is_empty() {
        return vec![0.0; counts.len()];
    }
    let expected = total as f64 / counts.len() as f64;
    counts.iter().map(|&c| c as f64 / expected).collect()
}

/// Positive gaps between consecutive sorted timestamps.
///
/// Zero or negative gaps (simultaneous or out-of-order records) are dropped.
pub fn interarrival_times(sorted_secs: &[f64]) -> Vec<f64> {
    sorted_secs
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .collect()
}

/// Parameters estimated from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoissonFit {
    pub event_count: usize,
    /// Seconds between first and last opening.
    pub span_secs: f64,
    /// λ in events per hour; `None` when all events share one instant.
    pub rate_per_hour: Option<f64>,
    pub mean_interarrival_secs: Option<f64>,
    /// λ_exp in events per second.
    pub exponential_rate: Option<f64>,
    pub percentile_intervals: Vec<PercentileInterval>,
    pub seasonal: SeasonalProfile,
    #[serde(skip)]
    pub interarrivals: Vec<f64>,
}

impl PoissonFit {
    /// Inverse exponential CDF at confidence `c` ∈ (0, 1).
    pub fn interval_at(&self, confidence: f64) -> Option<f64> {
        let lambda = self.exponential_rate?;
        exponential_quantile(lambda, confidence)
    }

    /// Probability that at least one opening occurs within `secs`.
    pub fn probability_within(&self, secs: f64) -> Option<f64> {
        let lambda = self.exponential_rate?;
        Some(1.0 - (-lambda * secs.max(0.0)).exp())
    }
}

/// `-ln(1 - c) / λ`; `None` outside the open unit interval or for λ ≤ 0.
pub fn exponential_quantile(lambda: f64, confidence: f64) -> Option<f64> {
    if !(confidence > 0.0 && confidence < 1.0) || !(lambda > 0.0) || !lambda.is_finite() {
        return None;
    }
    Some(-(1.0 - confidence).ln() / lambda)
}

/// Fits the Poisson model to event snapshots.
#[derive(Debug, Clone)]
pub struct PoissonProcessModel {
    levels: Vec<f64>,
}

impl Default for PoissonProcessModel {
    fn default() -> Self {
        Self {
            levels: PERCENTILE_LEVELS.to_vec(),
        }
    }
}

impl PoissonProcessModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&self, snapshot: &EventSnapshot) -> PoissonFit {
        let secs = snapshot.open_epoch_secs();
        let mut fit = self.fit_timestamps(&secs);
        fit.seasonal = SeasonalProfile::from_snapshot(snapshot);
        fit
    }

    /// Fit from sorted epoch seconds. The seasonal profile is left empty
    /// because bare timestamps carry no calendar context here.
    pub fn fit_timestamps(&self, sorted_secs: &[f64]) -> PoissonFit {
        let event_count = sorted_secs.len();
        let span_secs = match (sorted_secs.first(), sorted_secs.last()) {
            (Some(first), Some(last)) => (last - first).max(0.0),
            _ => 0.0,
        };
        let rate_per_hour = if span_secs > 0.0 {
            Some(event_count as f64 / (span_secs / SECS_PER_HOUR))
        } else {
            None
        };

        let interarrivals = interarrival_times(sorted_secs);
        let mean_interarrival_secs = bc_math::mean(&interarrivals);
        let exponential_rate = mean_interarrival_secs
            .filter(|m| *m > 0.0)
            .map(|m| 1.0 / m);

        let percentile_intervals = match exponential_rate {
            Some(lambda) => self
                .levels
                .iter()
                .filter_map(|&c| {
                    exponential_quantile(lambda, c).map(|interval_secs| PercentileInterval {
                        confidence: c,
                        interval_secs,
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        PoissonFit {
            event_count,
            span_secs,
            rate_per_hour,
            mean_interarrival_secs,
            exponential_rate,
            percentile_intervals,
            seasonal: SeasonalProfile {
                hourly_counts: vec![0; 24],
                weekday_counts: vec![0; 7],
                monthly_counts: vec![0; 12],
                hourly_rates: vec![0.0; 24],
                weekday_rates: vec![0.0; 7],
                monthly_rates: vec![0.0; 12],
            },
            interarrivals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_common::Event;
    use chrono::{TimeZone, Utc};

    fn hourly_snapshot(n: i64) -> EventSnapshot {
        let base = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        EventSnapshot::new(
            (0..n)
                .map(|i| Event::new(format!("e{i}"), base + chrono::TimeDelta::hours(i)))
                .collect(),
        )
    }

    #[test]
    fn test_hourly_events_rate() {
        let fit = PoissonProcessModel::new().fit(&hourly_snapshot(60));
        let rate = fit.rate_per_hour.unwrap();
        assert!((rate - 60.0 / 59.0).abs() < 1e-9);
        assert!((rate - 1.0).abs() / 1.0 < 0.05);
        assert!((fit.exponential_rate.unwrap() - 1.0 / 3600.0).abs() < 1e-15);
    }

    #[test]
    fn test_percentile_intervals() {
        let fit = PoissonProcessModel::new().fit(&hourly_snapshot(60));
        assert_eq!(fit.percentile_intervals.len(), 4);
        let p95 = fit.interval_at(0.95).unwrap();
        assert!((p95 - 3600.0 * 20.0f64.ln()).abs() < 1e-6);
        let widths: Vec<f64> = fit
            .percentile_intervals
            .iter()
            .map(|p| p.interval_secs)
            .collect();
        assert!(widths.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_simultaneous_events_discarded() {
        let fit = PoissonProcessModel::new().fit_timestamps(&[0.0, 0.0, 10.0, 10.0, 30.0]);
        assert_eq!(fit.interarrivals, vec![10.0, 20.0]);
        assert_eq!(fit.mean_interarrival_secs, Some(15.0));
    }

    #[test]
    fn test_single_event_has_no_rate() {
        let fit = PoissonProcessModel::new().fit_timestamps(&[100.0]);
        assert!(fit.rate_per_hour.is_none());
        assert!(fit.exponential_rate.is_none());
        assert!(fit.percentile_intervals.is_empty());
        assert!(fit.interval_at(0.95).is_none());
    }

    #[test]
    fn test_seasonal_profile_counts() {
        let fit = PoissonProcessModel::new().fit(&hourly_snapshot(48));
        assert!(fit.seasonal.hourly_counts.iter().all(|&c| c == 2));
        assert!(fit.seasonal.hourly_rates.iter().all(|&r| (r - 1.0).abs() < 1e-12));
        assert_eq!(fit.seasonal.weekday_counts.iter().sum::<usize>(), 48);
        // 2024-03-04 is a Monday.
        assert_eq!(fit.seasonal.weekday_counts[1], 24);
        assert_eq!(fit.seasonal.monthly_counts[2], 48);
    }

    #[test]
    fn test_relative_rates_empty() {
        assert_eq!(relative_rates(&[0, 0, 0]), vec![0.0, 0.0, 0.0]);
        assert_eq!(relative_rates(&[1, 3]), vec![0.5, 1.5]);
    }

    #[test]
    fn test_exponential_quantile_domain() {
        assert!(exponential_quantile(1.0, 1.0).is_none());
        assert!(exponential_quantile(1.0, 0.0).is_none());
        assert!(exponential_quantile(0.0, 0.5).is_none());
        let median = exponential_quantile(2.0, 0.5).unwrap();
        assert!((median - 2.0f64.ln() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_probability_within() {
        let fit = PoissonProcessModel::new().fit(&hourly_snapshot(10));
        let p = fit.probability_within(fit.interval_at(0.9).unwrap()).unwrap();
        assert!((p - 0.9).abs() < 1e-9);
    }
}
