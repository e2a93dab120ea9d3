//! Epoch-aligned time buckets keying the polled snapshot

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

use super::selection::Timeframe;

/// A fixed-duration window aligned to epoch time.
///
/// Derived deterministically from a wall-clock instant and a bucket
/// duration; recomputed on demand, never stored long-term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBucket {
    start_epoch: i64,
}

impl TimeBucket {
    /// Floor-align `now_epoch` to the bucket containing it
    pub fn at(now_epoch: i64, duration_secs: i64) -> Self {
        Self {
            start_epoch: (now_epoch / duration_secs) * duration_secs,
        }
    }

    /// Bucket containing the current wall-clock time
    pub fn current(timeframe: Timeframe) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::at(now, timeframe.duration_secs())
    }

    /// Bucket start in epoch seconds
    pub fn start_epoch(&self) -> i64 {
        self.start_epoch
    }

    /// Bucket start as an RFC 3339 UTC instant, e.g. `2023-11-14T22:15:00.000Z`
    pub fn iso_timestamp(&self) -> String {
        DateTime::<Utc>::from_timestamp(self.start_epoch, 0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default()
    }
}
