//! Reading event batches for the CLI.

use std::io::Read;
use std::path::Path;

use bc_common::{Error, Event, Result};

/// Parse a JSON array of `{id, open_time, close_time?}` records.
pub fn parse_events(raw: &str) -> Result<Vec<Event>> {
    let events: Vec<Event> =
        serde_json::from_str(raw).map_err(|e| Error::InvalidInput(e.to_string()))?;
    if let Some(bad) = events
        .iter()
        .find(|e| e.close_time.is_some_and(|close| close < e.open_time))
    {
        return Err(Error::InvalidInput(format!(
            "event {} closes before it opens",
            bad.id
        )));
    }
    Ok(events)
}

/// Read events from `path`, or from stdin when the path is `-`.
pub fn read_events(path: &Path) -> Result<Vec<Event>> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_events(&raw)
}
