//! Bridge cadence configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for analysis.json
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation
//! - Config snapshots for provenance in output

pub mod analysis;
pub mod load;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use analysis::{
    AnalysisConfig, ChangePointSettings, GoodnessOfFitSettings, SeasonalSettings,
    ThresholdSettings, TrendSettings,
};
pub use load::{event_names, load_config, load_config_file, ConfigError, LoadedConfig};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
