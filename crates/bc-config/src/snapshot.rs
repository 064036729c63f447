//! Configuration snapshots for reproducibility.
//!
//! A snapshot records which configuration produced a recommendation, so a
//! surprising interval can be traced back to the file and values in force.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::analysis::AnalysisConfig;
use crate::resolve::ConfigPaths;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// SHA-256 hash of the config file content.
    #[serde(default)]
    pub config_hash: Option<String>,

    /// Path where the config was loaded from.
    #[serde(default)]
    pub config_path: Option<String>,

    /// Source of the configuration.
    pub config_source: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub minimum_data_points: usize,
    pub analysis_confidence_level: f64,
    pub change_detection_threshold: f64,
    pub event_cap: usize,
    pub fallback_interval_secs: f64,
}

impl ConfigSnapshot {
    /// Create a new snapshot from loaded configuration.
    pub fn new(config: &AnalysisConfig, paths: &ConfigPaths, raw_json: Option<&str>) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            config_hash: raw_json.map(hash_content),
            config_path: paths
                .analysis
                .as_ref()
                .map(|p| p.display().to_string()),
            config_source: paths.analysis_source.to_string(),
            summary: ConfigSummary {
                minimum_data_points: config.minimum_data_points,
                analysis_confidence_level: config.analysis_confidence_level,
                change_detection_threshold: config.change_detection_threshold,
                event_cap: config.event_cap,
                fallback_interval_secs: config.fallback_interval_secs,
            },
        }
    }

    /// Whether two snapshots were taken from identical file content.
    pub fn same_content(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }
}

/// Hex-encoded SHA-256 of `content`.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
