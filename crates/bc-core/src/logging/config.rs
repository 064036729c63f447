//! Logging configuration.
//!
//! Level precedence: CLI (`-v` / `-q`), then `BC_LOG`, then raw `RUST_LOG`
//! directives, then `warn`. `--log-format` beats `BC_LOG_FORMAT`.

use clap::ValueEnum;

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable console lines.
    #[default]
    #[value(alias = "console")]
    Human,
    /// One JSON object per line.
    #[value(alias = "json")]
    Jsonl,
}

/// Workspace-wide level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        };
        f.write_str(s)
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Raw `RUST_LOG` directives; only set when neither the CLI nor
    /// `BC_LOG` chose a level.
    pub directives: Option<String>,
}

impl LogConfig {
    /// Resolve from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Same as [`LogConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let level = cli_level.or_else(|| lookup("BC_LOG").and_then(|v| v.parse().ok()));
        let directives = match level {
            Some(_) => None,
            None => lookup("RUST_LOG").filter(|v| !v.trim().is_empty()),
        };
        let format = cli_format
            .or_else(|| lookup("BC_LOG_FORMAT").and_then(|v| LogFormat::from_str(&v, true).ok()))
            .unwrap_or_default();

        LogConfig {
            format,
            level: level.unwrap_or(LogLevel::Warn),
            directives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" Quiet ".parse::<LogLevel>(), Ok(LogLevel::Off));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = LogConfig::from_lookup(|_| None, None, None);
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.level, LogLevel::Warn);
        assert!(config.directives.is_none());
    }

    #[test]
    fn test_bc_log_hides_rust_log() {
        let config = LogConfig::from_lookup(
            lookup(&[("BC_LOG", "error"), ("RUST_LOG", "debug")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Error);
        assert!(config.directives.is_none());
    }

    #[test]
    fn test_rust_log_kept_as_directives() {
        let config = LogConfig::from_lookup(
            lookup(&[("RUST_LOG", "bc_core=debug"), ("BC_LOG_FORMAT", "json")]),
            None,
            None,
        );
        assert_eq!(config.directives.as_deref(), Some("bc_core=debug"));
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = LogConfig::from_lookup(
            lookup(&[("BC_LOG", "trace"), ("RUST_LOG", "trace"), ("BC_LOG_FORMAT", "jsonl")]),
            Some(LogLevel::Off),
            Some(LogFormat::Human),
        );
        assert_eq!(config.level, LogLevel::Off);
        assert_eq!(config.format, LogFormat::Human);
        assert!(config.directives.is_none());
    }
}
