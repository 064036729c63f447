//! Stable event names and pipeline stages for structured logs.
//!
//! Event names are used as the `event` field on every tracing record the
//! engine emits, so log consumers can filter without parsing messages.

use serde::{Deserialize, Serialize};

/// Processing stages in the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading and capping the event batch.
    Ingest,
    /// Poisson fit and the independent sub-analyses.
    Infer,
    /// Threshold calculation and recommendation fusion.
    Decide,
    /// Cache replacement and real-time scoring.
    Publish,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Ingest => "ingest",
            Stage::Infer => "infer",
            Stage::Decide => "decide",
            Stage::Publish => "publish",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Analysis lifecycle
    pub const ANALYSIS_STARTED: &str = "analysis.started";
    pub const ANALYSIS_FINISHED: &str = "analysis.finished";
    pub const ANALYSIS_INSUFFICIENT_DATA: &str = "analysis.insufficient_data";

    // Ingest stage
    pub const INGEST_TRUNCATED: &str = "ingest.truncated";
    pub const INGEST_LOADED: &str = "ingest.loaded";
    pub const INGEST_WINDOWS_CAPPED: &str = "ingest.windows_capped";

    // Infer stage
    pub const INFER_FINISHED: &str = "infer.finished";

    // Decide stage
    pub const DECIDE_RECOMMENDED: &str = "decide.recommended";

    // Publish stage
    pub const STATE_REPLACED: &str = "state.replaced";
    pub const REALTIME_SCORED: &str = "realtime.scored";

    // Config/init events; loading is logged by bc-config itself
    pub use bc_config::event_names::{CONFIG_DEFAULTS_USED, CONFIG_LOADED};
    pub const CONFIG_ERROR: &str = "config.error";
}
