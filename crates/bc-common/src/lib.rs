//! Bridge cadence common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Bridge-opening event records and snapshot helpers
//! - Event and analysis-run identifiers
//! - Common error types
//! - Output format definitions

pub mod error;
pub mod event;
pub mod id;
pub mod output;

pub use error::{Error, ErrorCategory, Result};
pub use event::{Event, EventSnapshot};
pub use id::{EventId, RunId};
pub use output::OutputFormat;

/// Schema version for serialized analysis output.
pub const SCHEMA_VERSION: &str = "1.0.0";
