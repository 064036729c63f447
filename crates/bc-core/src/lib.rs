//! Bridge Cadence Core Library
//!
//! Turns a batch of drawbridge-opening events into a recommended refresh
//! interval:
//! - Poisson rate model and percentile intervals
//! - CUSUM/EWMA change points, KS drift test, seasonality, and trend
//! - Adaptive thresholds and recommendation fusion
//! - A service facade with an atomically replaced state cache
//!
//! The binary entry point is in `main.rs`.

pub mod analysis;
pub mod decision;
pub mod exit_codes;
pub mod inference;
pub mod input;
pub mod logging;
pub mod service;
pub mod window;

pub use analysis::{AnalysisReport, Analyzer, Diagnostics};
pub use decision::{Recommendation, RecommendationMethod};
pub use service::{
    AnalysisService, AnalysisState, DataFreshness, PatternStability, RealTimeAnalysis, ServiceRun,
};
