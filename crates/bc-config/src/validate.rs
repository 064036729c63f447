//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::analysis::AnalysisConfig;

/// Upper bound for `recent_activity_window_secs` (one leap year).
pub const MAX_RECENT_ACTIVITY_WINDOW_SECS: f64 = 366.0 * 86_400.0;

/// Upper bound for the per-analysis window caps.
pub const MAX_WINDOW_CAP: usize = 1_000_000;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }

    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate an analysis configuration semantically.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if config.minimum_data_points < 2 {
        return Err(ValidationError::invalid(
            "minimum_data_points",
            format!("Must be >= 2, got {}", config.minimum_data_points),
        ));
    }
    validate_open_unit("analysis_confidence_level", config.analysis_confidence_level)?;
    validate_open_unit("change_detection_threshold", config.change_detection_threshold)?;
    if config.event_cap < config.minimum_data_points {
        return Err(ValidationError::invalid(
            "event_cap",
            format!(
                "Must be >= minimum_data_points ({}), got {}",
                config.minimum_data_points, config.event_cap
            ),
        ));
    }
    validate_positive("fallback_interval_secs", config.fallback_interval_secs)?;
    validate_positive("recent_activity_window_secs", config.recent_activity_window_secs)?;
    if config.recent_activity_window_secs > MAX_RECENT_ACTIVITY_WINDOW_SECS {
        return Err(ValidationError::invalid(
            "recent_activity_window_secs",
            format!(
                "Must be <= {}, got {}",
                MAX_RECENT_ACTIVITY_WINDOW_SECS, config.recent_activity_window_secs
            ),
        ));
    }
    validate_non_negative("iqr_multiplier", config.iqr_multiplier)?;

    let cp = &config.change_point;
    validate_positive("change_point.window_secs", cp.window_secs)?;
    validate_positive("change_point.cusum_multiplier", cp.cusum_multiplier)?;
    if !(cp.ewma_alpha > 0.0 && cp.ewma_alpha <= 1.0) {
        return Err(ValidationError::invalid(
            "change_point.ewma_alpha",
            format!("Must be in (0, 1], got {}", cp.ewma_alpha),
        ));
    }
    validate_positive("change_point.ewma_deviation_fraction", cp.ewma_deviation_fraction)?;
    validate_unit("change_point.both_confidence", cp.both_confidence)?;
    validate_unit("change_point.single_confidence", cp.single_confidence)?;
    validate_window_cap("change_point.max_windows", cp.max_windows)?;

    if config.goodness_of_fit.min_samples_per_half == 0 {
        return Err(ValidationError::invalid(
            "goodness_of_fit.min_samples_per_half",
            "Must be >= 1",
        ));
    }

    let s = &config.seasonal;
    validate_non_negative("seasonal.hourly_variance_cutoff", s.hourly_variance_cutoff)?;
    validate_non_negative("seasonal.daily_variance_cutoff", s.daily_variance_cutoff)?;
    validate_non_negative("seasonal.monthly_variance_cutoff", s.monthly_variance_cutoff)?;
    validate_non_negative("seasonal.min_cycles", s.min_cycles)?;

    let t = &config.trend;
    validate_positive("trend.window_secs", t.window_secs)?;
    validate_non_negative("trend.slope_cutoff", t.slope_cutoff)?;
    validate_unit("trend.r_squared_cutoff", t.r_squared_cutoff)?;
    validate_open_unit("trend.significance_level", t.significance_level)?;
    validate_window_cap("trend.max_windows", t.max_windows)?;

    let th = &config.thresholds;
    validate_positive("thresholds.conservative_factor", th.conservative_factor)?;
    validate_positive("thresholds.moderate_factor", th.moderate_factor)?;
    validate_positive("thresholds.aggressive_factor", th.aggressive_factor)?;

    Ok(())
}

fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("Must be finite and > 0, got {}", value),
        ));
    }
    Ok(())
}

fn validate_window_cap(field: &str, value: usize) -> ValidationResult<()> {
    if !(2..=MAX_WINDOW_CAP).contains(&value) {
        return Err(ValidationError::invalid(
            field,
            format!("Must be in [2, {}], got {}", MAX_WINDOW_CAP, value),
        ));
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("Must be finite and >= 0, got {}", value),
        ));
    }
    Ok(())
}

fn validate_unit(field: &str, value: f64) -> ValidationResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::invalid(
            field,
            format!("Must be in [0, 1], got {}", value),
        ));
    }
    Ok(())
}

fn validate_open_unit(field: &str, value: f64) -> ValidationResult<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(ValidationError::invalid(
            field,
            format!("Must be in (0, 1), got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn rejects_confidence_level_at_one() {
        let config = AnalysisConfig {
            analysis_confidence_level: 1.0,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidValue { ref field, .. } if field == "analysis_confidence_level"
        ));
        assert_eq!(err.code(), 65);
    }

    #[test]
    fn rejects_zero_ewma_alpha() {
        let mut config = AnalysisConfig::default();
        config.change_point.ewma_alpha = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_cap_below_minimum() {
        let config = AnalysisConfig {
            event_cap: 10,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_schema_mismatch() {
        let config = AnalysisConfig {
            schema_version: "0.9.0".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_unbounded_recent_window() {
        let config = AnalysisConfig {
            recent_activity_window_secs: 1e13,
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidValue { ref field, .. } if field == "recent_activity_window_secs"
        ));
    }

    #[test]
    fn window_caps_are_bounded() {
        let mut config = AnalysisConfig::default();
        config.change_point.max_windows = 1;
        assert!(validate_config(&config).is_err());

        let mut config = AnalysisConfig::default();
        config.trend.max_windows = MAX_WINDOW_CAP + 1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_nan_window() {
        let mut config = AnalysisConfig::default();
        config.trend.window_secs = f64::NAN;
        assert!(validate_config(&config).is_err());
    }
}
