//! Bridge-opening event records.
//!
//! Events arrive from an upstream store as an immutable batch. The engine
//! only reads them: it never edits, reorders in place, or persists a record.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::id::EventId;

/// One bridge opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// When the span started lifting.
    pub open_time: DateTime<Utc>,
    /// When the span was lowered again; absent while the bridge is up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(id: impl Into<EventId>, open_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            open_time,
            close_time: None,
        }
    }

    pub fn closed_at(mut self, close_time: DateTime<Utc>) -> Self {
        self.close_time = Some(close_time);
        self
    }

    /// Whether the bridge is still open.
    pub fn is_open(&self) -> bool {
        self.close_time.is_none()
    }

    /// Opening length in minutes, derived from the two timestamps.
    pub fn duration_minutes(&self) -> Option<f64> {
        let close = self.close_time?;
        let millis = (close - self.open_time).num_milliseconds();
        Some(millis as f64 / 60_000.0)
    }

    /// Open time as fractional seconds since the Unix epoch.
    pub fn open_epoch_secs(&self) -> f64 {
        self.open_time.timestamp_millis() as f64 / 1000.0
    }
}

/// Chronologically ordered, read-only view over a batch of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Event>", into = "Vec<Event>")]
pub struct EventSnapshot {
    events: Vec<Event>,
}

impl From<Vec<Event>> for EventSnapshot {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

impl From<EventSnapshot> for Vec<Event> {
    fn from(snapshot: EventSnapshot) -> Self {
        snapshot.events
    }
}

impl EventSnapshot {
    /// Build a snapshot; input order does not matter.
    pub fn new(mut events: Vec<Event>) -> Self {
        events.sort_by(|a, b| a.open_time.cmp(&b.open_time).then_with(|| a.id.cmp(&b.id)));
        Self { events }
    }

    pub fn from_slice(events: &[Event]) -> Self {
        Self::new(events.to_vec())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Keep only the `cap` most recent events.
    pub fn most_recent(mut self, cap: usize) -> Self {
        if self.events.len() > cap {
            let drop = self.events.len() - cap;
            self.events.drain(..drop);
        }
        self
    }

    /// Sorted open times in epoch seconds.
    pub fn open_epoch_secs(&self) -> Vec<f64> {
        self.events.iter().map(Event::open_epoch_secs).collect()
    }

    pub fn first_open(&self) -> Option<DateTime<Utc>> {
        self.events.first().map(|e| e.open_time)
    }

    pub fn latest_open(&self) -> Option<DateTime<Utc>> {
        self.events.last().map(|e| e.open_time)
    }

    /// Number of events that have not closed yet.
    pub fn open_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_open()).count()
    }

    /// Number of openings within `window` before `now` (inclusive of `now`).
    ///
    /// A window reaching past the earliest representable instant counts
    /// everything up to `now`.
    pub fn recent_count(&self, now: DateTime<Utc>, window: TimeDelta) -> usize {
        let since = now
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.events
            .iter()
            .filter(|e| e.open_time > since && e.open_time <= now)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn duration_from_timestamps() {
        let e = Event::new("a", at(0)).closed_at(at(450));
        assert_eq!(e.duration_minutes(), Some(7.5));
        assert!(!e.is_open());
        assert_eq!(Event::new("b", at(0)).duration_minutes(), None);
    }

    #[test]
    fn snapshot_sorts_by_open_time() {
        let snap = EventSnapshot::new(vec![
            Event::new("c", at(300)),
            Event::new("a", at(0)),
            Event::new("b", at(100)),
        ]);
        let ids: Vec<_> = snap.events().iter().map(|e| e.id.0.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(snap.first_open(), Some(at(0)));
        assert_eq!(snap.latest_open(), Some(at(300)));
    }

    #[test]
    fn most_recent_keeps_tail() {
        let events = (0..10).map(|i| Event::new(format!("e{i}"), at(i * 60))).collect();
        let snap = EventSnapshot::new(events).most_recent(3);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.first_open(), Some(at(420)));
    }

    #[test]
    fn open_and_recent_counts() {
        let snap = EventSnapshot::new(vec![
            Event::new("old", at(0)).closed_at(at(600)),
            Event::new("recent", at(5_000)).closed_at(at(5_400)),
            Event::new("up", at(6_000)),
        ]);
        assert_eq!(snap.open_count(), 1);
        assert_eq!(snap.recent_count(at(6_100), TimeDelta::hours(1)), 2);
        assert_eq!(snap.recent_count(at(6_100), TimeDelta::minutes(5)), 1);
    }

    #[test]
    fn recent_count_saturates_huge_window() {
        let snap = EventSnapshot::new(vec![
            Event::new("a", at(0)),
            Event::new("b", at(100)),
            Event::new("later", at(10_000)),
        ]);
        assert_eq!(snap.recent_count(at(200), TimeDelta::MAX), 2);
    }

    #[test]
    fn deserializes_sorted_without_close_time() {
        let json = r#"[
            {"id":"y","open_time":"2024-05-01T13:00:00Z","close_time":"2024-05-01T13:10:00Z"},
            {"id":"x","open_time":"2024-05-01T12:00:00Z"}
        ]"#;
        let snap: EventSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.events()[0].id, EventId::from("x"));
        assert!(snap.events()[0].is_open());
        assert_eq!(snap.events()[1].duration_minutes(), Some(10.0));
    }
}
