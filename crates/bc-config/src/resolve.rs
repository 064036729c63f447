//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path →
//! system path → built-in defaults.

use std::path::{Path, PathBuf};

/// Discovered configuration file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to analysis.json (or None if not found).
    pub analysis: Option<PathBuf>,

    /// Where the file was found (for diagnostics).
    pub analysis_source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/bridge-cadence/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
const ENV_CONFIG_PATH: &str = "BRIDGE_CADENCE_CONFIG";
const ENV_CONFIG_DIR: &str = "BRIDGE_CADENCE_CONFIG_DIR";

/// Standard config file name.
const ANALYSIS_FILENAME: &str = "analysis.json";

/// Application name for XDG directories.
const APP_NAME: &str = "bridge-cadence";

/// Resolve the analysis configuration path.
///
/// 1. Explicit CLI path (if it exists)
/// 2. BRIDGE_CADENCE_CONFIG
/// 3. BRIDGE_CADENCE_CONFIG_DIR + analysis.json
/// 4. XDG config directory (~/.config/bridge-cadence/)
/// 5. System config (/etc/bridge-cadence/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPaths {
    let mut paths = ConfigPaths::default();
    paths.analysis = resolve_single_config(cli_path, &mut paths.analysis_source);
    paths
}

fn resolve_single_config(cli_path: Option<&Path>, source: &mut ConfigSource) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        if path.exists() {
            *source = ConfigSource::CliArgument;
            return Some(path.to_path_buf());
        }
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(ANALYSIS_FILENAME);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(ANALYSIS_FILENAME);
        if path.exists() {
            *source = ConfigSource::XdgConfig;
            return Some(path);
        }
    }

    let system_path = system_config_dir().join(ANALYSIS_FILENAME);
    if system_path.exists() {
        *source = ConfigSource::SystemConfig;
        return Some(system_path);
    }

    *source = ConfigSource::BuiltinDefault;
    None
}

/// Get the XDG config directory for bridge-cadence.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(format!("{}", ConfigSource::SystemConfig), "system config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_cli_path_wins_when_present() {
        let dir = std::env::temp_dir();
        let paths = resolve_config(Some(&dir));
        assert_eq!(paths.analysis.as_deref(), Some(dir.as_path()));
        assert_eq!(paths.analysis_source, ConfigSource::CliArgument);
    }

    #[test]
    fn test_system_config_dir() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/bridge-cadence"));
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
