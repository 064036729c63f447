//! Fixed-width counting windows over event timestamps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::{event_names, Stage};

/// One non-overlapping bucket of the observed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Bucket start, epoch seconds.
    pub start_secs: f64,
    pub event_count: usize,
}

/// Bin sorted timestamps into `window_secs`-wide buckets aligned to the
/// first timestamp. Every bucket up to the last event is present, with a
/// count of zero when nothing happened in it.
///
/// At most `max_windows` buckets are built: when the span needs more, only
/// the most recent ones are kept and earlier timestamps are ignored, so the
/// cost is bounded by the event count and the cap rather than the span.
pub fn bin_timestamps(sorted_secs: &[f64], window_secs: f64, max_windows: usize) -> Vec<Window> {
    let (Some(&first), Some(&last)) = (sorted_secs.first(), sorted_secs.last()) else {
        return Vec::new();
    };
    if window_secs.is_nan() || window_secs <= 0.0 || max_windows == 0 {
        return Vec::new();
    }
    let total = ((last - first) / window_secs).floor() + 1.0;
    let kept = total.min(max_windows as f64) as usize;
    let skipped = total - kept as f64;
    if skipped > 0.0 {
        debug!(
            event = event_names::INGEST_WINDOWS_CAPPED,
            stage = %Stage::Ingest,
            window_secs,
            total_windows = total,
            kept_windows = kept,
            "binned span exceeds window cap, keeping most recent windows"
        );
    }

    let mut windows: Vec<Window> = (0..kept)
        .map(|i| Window {
            start_secs: first + (skipped + i as f64) * window_secs,
            event_count: 0,
        })
        .collect();
    for &t in sorted_secs {
        let idx = ((t - first) / window_secs).floor() - skipped;
        if idx < 0.0 {
            continue;
        }
        let idx = (idx as usize).min(kept - 1);
        windows[idx].event_count += 1;
    }
    windows
}

/// Window counts as `f64`, ready for the statistics primitives.
pub fn counts(windows: &[Window]) -> Vec<f64> {
    windows.iter().map(|w| w.event_count as f64).collect()
}
