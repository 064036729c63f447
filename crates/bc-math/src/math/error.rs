//! Argument errors for statistics primitives.
//!
//! Short or empty inputs are not errors: the primitives return `None` for
//! those. Only arguments outside their mathematical domain are rejected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("invalid percentile: {0} (must be in [0, 1])")]
    InvalidPercentile(f64),

    #[error("invalid trim fraction: {0} (must be in [0, 0.5))")]
    InvalidTrimFraction(f64),

    #[error("unsupported confidence level: {0} (supported: 0.90, 0.95, 0.99)")]
    UnsupportedConfidenceLevel(f64),

    #[error("invalid IQR multiplier: {0} (must be finite and >= 0)")]
    InvalidMultiplier(f64),
}
