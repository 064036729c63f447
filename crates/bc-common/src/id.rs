//! Event and analysis-run identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a bridge-opening event, as assigned by the upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        EventId(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        EventId(s)
    }
}

/// Correlation ID for one analysis run, used in logs.
///
/// Format: `run-` followed by the first 12 hex characters of a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        RunId(format!("run-{}", &uuid[..12]))
    }

    /// Parse an existing run ID string.
    pub fn parse(s: &str) -> Option<Self> {
        let suffix = s.strip_prefix("run-")?;
        if suffix.len() != 12 || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(RunId(s.to_string()))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
