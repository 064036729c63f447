//! Structured logging for bc-core.
//!
//! Human-readable lines for interactive use, JSON lines for pipelines.
//! Every record carries an `event` field from [`event_names`] and a
//! `stage` field from [`Stage`]:
//!
//! ```ignore
//! tracing::info!(
//!     event = event_names::ANALYSIS_STARTED,
//!     stage = %Stage::Infer,
//!     events = 120,
//!     "starting analysis"
//! );
//! ```
//!
//! stdout is reserved for command payloads; all log output goes to stderr.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Stage};

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter for a resolved configuration.
///
/// Raw `RUST_LOG` directives apply only when they were kept during
/// resolution and parse; otherwise the resolved level covers everything.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    config
        .directives
        .as_deref()
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(config.level.to_string()))
}

/// Install the global subscriber.
///
/// Later calls are ignored, so tests and embedding applications can
/// install their own subscriber first.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    let result = match config.format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .try_init(),
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
