//! Periodicity classification from calendar activity profiles.

use bc_common::EventSnapshot;
use bc_config::SeasonalSettings;
use serde::{Deserialize, Serialize};

use super::poisson::{relative_rates, SeasonalProfile};

const SECS_PER_DAY: f64 = 86_400.0;
const HOURLY_CYCLE_SECS: f64 = SECS_PER_DAY;
const DAILY_CYCLE_SECS: f64 = 7.0 * SECS_PER_DAY;
const MONTHLY_CYCLE_SECS: f64 = 365.25 * SECS_PER_DAY;

/// Dominant periodicity in the opening history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalPattern {
    #[default]
    None,
    /// Activity varies by hour of day.
    Hourly,
    /// Activity varies by day of week.
    Daily,
    /// Activity varies by month of year.
    Monthly,
}

impl SeasonalPattern {
    pub fn is_present(self) -> bool {
        self != SeasonalPattern::None
    }
}

impl std::fmt::Display for SeasonalPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonalPattern::None => write!(f, "none"),
            SeasonalPattern::Hourly => write!(f, "hourly"),
            SeasonalPattern::Daily => write!(f, "daily"),
            SeasonalPattern::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalResult {
    pub pattern: SeasonalPattern,
    /// Population variance of the relative hour-of-day profile.
    pub hourly_variance: Option<f64>,
    pub daily_variance: Option<f64>,
    pub monthly_variance: Option<f64>,
    /// Periods whose full-cycle coverage requirement was met.
    pub eligible: Vec<SeasonalPattern>,
}

impl SeasonalResult {
    fn none() -> Self {
        Self {
            pattern: SeasonalPattern::None,
            hourly_variance: None,
            daily_variance: None,
            monthly_variance: None,
            eligible: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeasonalAnalyzer {
    settings: SeasonalSettings,
    minimum_points: usize,
}

impl SeasonalAnalyzer {
    pub fn new(settings: SeasonalSettings, minimum_points: usize) -> Self {
        Self {
            settings,
            minimum_points,
        }
    }

    pub fn analyze(&self, snapshot: &EventSnapshot, profile: &SeasonalProfile) -> SeasonalResult {
        if snapshot.len() < self.minimum_points {
            return SeasonalResult::none();
        }
        let span_secs = match (snapshot.first_open(), snapshot.latest_open()) {
            (Some(first), Some(last)) => (last - first).num_milliseconds() as f64 / 1000.0,
            _ => 0.0,
        };
        self.classify(profile, span_secs)
    }

    /// Classify a profile observed over `span_secs`.
    pub fn classify(&self, profile: &SeasonalProfile, span_secs: f64) -> SeasonalResult {
        let covers = |cycle: f64| span_secs >= self.settings.min_cycles * cycle;

        let hourly_variance = profile_variance(&profile.hourly_counts);
        let daily_variance = profile_variance(&profile.weekday_counts);
        let monthly_variance = profile_variance(&profile.monthly_counts);

        let candidates = [
            (
                SeasonalPattern::Hourly,
                HOURLY_CYCLE_SECS,
                hourly_variance,
                self.settings.hourly_variance_cutoff,
            ),
            (
                SeasonalPattern::Daily,
                DAILY_CYCLE_SECS,
                daily_variance,
                self.settings.daily_variance_cutoff,
            ),
            (
                SeasonalPattern::Monthly,
                MONTHLY_CYCLE_SECS,
                monthly_variance,
                self.settings.monthly_variance_cutoff,
            ),
        ];

        let eligible: Vec<SeasonalPattern> = candidates
            .iter()
            .filter(|(_, cycle, _, _)| covers(*cycle))
            .map(|(pattern, _, _, _)| *pattern)
            .collect();

        let pattern = candidates
            .iter()
            .find(|(pattern, _, variance, cutoff)| {
                eligible.contains(pattern) && variance.is_some_and(|v| v > *cutoff)
            })
            .map(|(pattern, _, _, _)| *pattern)
            .unwrap_or_default();

        SeasonalResult {
            pattern,
            hourly_variance,
            daily_variance,
            monthly_variance,
            eligible,
        }
    }
}

fn profile_variance(counts: &[usize]) -> Option<f64> {
    if counts.iter().all(|&c| c == 0) {
        return None;
    }
    bc_math::population_variance(&relative_rates(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_common::Event;
    use chrono::{Datelike, TimeDelta, TimeZone, Utc};

    fn analyzer() -> SeasonalAnalyzer {
        SeasonalAnalyzer::new(SeasonalSettings::default(), 20)
    }

    fn profile_for(snapshot: &EventSnapshot) -> SeasonalProfile {
        crate::inference::PoissonProcessModel::new()
            .fit(snapshot)
            .seasonal
    }

    fn snapshot_from(offsets_secs: impl IntoIterator<Item = i64>) -> EventSnapshot {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        EventSnapshot::new(
            offsets_secs
                .into_iter()
                .enumerate()
                .map(|(i, s)| Event::new(format!("e{i}"), base + TimeDelta::seconds(s)))
                .collect(),
        )
    }

    #[test]
    fn uniform_hours_are_not_seasonal() {
        let snap = snapshot_from((0..72).map(|h| h * 3600));
        let result = analyzer().analyze(&snap, &profile_for(&snap));
        assert_eq!(result.pattern, SeasonalPattern::None);
        assert!(result.hourly_variance.unwrap() < 1e-12);
        assert!(result.eligible.contains(&SeasonalPattern::Hourly));
    }

    #[test]
    fn rush_hour_is_hourly_seasonal() {
        // Five openings at 08:00 and one at 20:00 every day for three days.
        let snap = snapshot_from((0..3).flat_map(|d| {
            let day = d * 86_400;
            (0..5)
                .map(move |k| day + 8 * 3600 + k * 60)
                .chain(std::iter::once(day + 20 * 3600))
        }));
        assert_eq!(snap.len(), 18);
        let analyzer = SeasonalAnalyzer::new(SeasonalSettings::default(), 10);
        let result = analyzer.analyze(&snap, &profile_for(&snap));
        assert_eq!(result.pattern, SeasonalPattern::Hourly);
        assert!(result.hourly_variance.unwrap() > 0.5);
    }

    #[test]
    fn below_minimum_points_is_none() {
        let snap = snapshot_from((0..10).map(|h| h * 60));
        let result = analyzer().analyze(&snap, &profile_for(&snap));
        assert_eq!(result, SeasonalResult::none());
    }

    #[test]
    fn short_span_is_not_eligible() {
        // Clustered in one morning: high hourly variance but under two days.
        let snap = snapshot_from((0..30).map(|k| k * 60));
        let result = analyzer().analyze(&snap, &profile_for(&snap));
        assert!(result.hourly_variance.unwrap() > 0.5);
        assert!(result.eligible.is_empty());
        assert_eq!(result.pattern, SeasonalPattern::None);
    }

    #[test]
    fn priority_prefers_hourly() {
        let mut profile = profile_for(&snapshot_from(std::iter::empty()));
        profile.hourly_counts[3] = 10;
        profile.weekday_counts[1] = 10;
        profile.monthly_counts[0] = 10;
        let result = analyzer().classify(&profile, 3.0 * MONTHLY_CYCLE_SECS);
        assert_eq!(result.pattern, SeasonalPattern::Hourly);
        assert_eq!(result.eligible.len(), 3);
    }

    #[test]
    fn weekday_only_openings_are_daily_seasonal() {
        // 2024-01-01 is a Monday. One opening every hour on weekdays for
        // four weeks, nothing at weekends.
        let snap = snapshot_from(
            (0..28)
                .filter(|d| d % 7 < 5)
                .flat_map(|d| (0..24).map(move |h| d * 86_400 + h * 3600)),
        );
        assert_eq!(snap.len(), 480);
        let result = analyzer().analyze(&snap, &profile_for(&snap));
        assert!(result.hourly_variance.unwrap() < 1e-12);
        assert!((result.daily_variance.unwrap() - 0.4).abs() < 1e-9);
        assert_eq!(result.eligible, vec![SeasonalPattern::Hourly, SeasonalPattern::Daily]);
        assert_eq!(result.pattern, SeasonalPattern::Daily);
    }

    #[test]
    fn summer_only_openings_are_monthly_seasonal() {
        // One opening a day through June to August of 2024, 2025 and 2026,
        // rotating through the hours of the day.
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let summer_days: Vec<i64> = (0..3 * 366)
            .filter(|&d| {
                let date = base + TimeDelta::days(d);
                date.year() <= 2026 && (6..=8).contains(&date.month())
            })
            .collect();
        assert_eq!(summer_days.len(), 3 * 92);
        let snap = snapshot_from(
            summer_days
                .iter()
                .enumerate()
                .map(|(k, &d)| d * 86_400 + (k as i64 % 24) * 3600),
        );
        let result = analyzer().analyze(&snap, &profile_for(&snap));
        assert!(result.hourly_variance.unwrap() <= 0.5);
        assert!(result.daily_variance.unwrap() <= 0.3);
        assert!(result.monthly_variance.unwrap() > 0.2);
        assert!(result.eligible.contains(&SeasonalPattern::Monthly));
        assert_eq!(result.pattern, SeasonalPattern::Monthly);
    }
}
