//! Loading configuration files from disk.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::AnalysisConfig;
use crate::resolve::{resolve_config, ConfigPaths};
use crate::snapshot::ConfigSnapshot;
use crate::validate::{validate_config, ValidationError};

/// `event` field values for config-loading log records.
pub mod event_names {
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULTS_USED: &str = "config.defaults_used";
}

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AnalysisConfig,
    pub paths: ConfigPaths,
    pub snapshot: ConfigSnapshot,
}

/// Resolve, read, and validate the analysis configuration.
///
/// An explicit `cli_path` that does not exist is an error; every other
/// missing location falls through to the next one and finally to defaults.
pub fn load_config(cli_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
    }

    let paths = resolve_config(cli_path);
    let Some(path) = paths.analysis.clone() else {
        let config = AnalysisConfig::default();
        debug!(
            event = event_names::CONFIG_DEFAULTS_USED,
            stage = "init",
            "no analysis config found, using defaults"
        );
        let snapshot = ConfigSnapshot::new(&config, &paths, None);
        return Ok(LoadedConfig {
            config,
            paths,
            snapshot,
        });
    };

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
        path: path.clone(),
        source,
    })?;
    let config = parse_and_validate(&path, &raw)?;
    info!(
        event = event_names::CONFIG_LOADED,
        stage = "init",
        path = %path.display(),
        source = %paths.analysis_source,
        "analysis config loaded"
    );
    let snapshot = ConfigSnapshot::new(&config, &paths, Some(&raw));
    Ok(LoadedConfig {
        config,
        paths,
        snapshot,
    })
}

/// Read and validate one specific file, bypassing resolution.
pub fn load_config_file(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_and_validate(path, &raw)
}

fn parse_and_validate(path: &Path, raw: &str) -> Result<AnalysisConfig, ConfigError> {
    let config: AnalysisConfig =
        serde_json::from_str(raw).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
    validate_config(&config)?;
    Ok(config)
}
