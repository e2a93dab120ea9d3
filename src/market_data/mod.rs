//! Market data state shared between the stream, the poller and the presenter

pub mod bucket;
pub mod selection;

pub use bucket::TimeBucket;
pub use selection::{Asset, Selection, Timeframe};

use serde_json::Value;
use tracing::debug;

use crate::vatic::types::{RestError, extract_target_price};

/// Stream connection status as shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Connecting,
    Open,
    Closed,
}

impl StreamStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StreamStatus::Connecting => "connecting",
            StreamStatus::Open => "open",
            StreamStatus::Closed => "closed",
        }
    }
}

/// Outcome of the most recent snapshot poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Ok,
    RateLimited,
    HttpError(u16),
    NetworkError,
}

impl From<&RestError> for FetchStatus {
    fn from(err: &RestError) -> Self {
        match err {
            RestError::RateLimited => FetchStatus::RateLimited,
            RestError::Status(code) => FetchStatus::HttpError(*code),
            RestError::Network(_) => FetchStatus::NetworkError,
        }
    }
}

/// The last fetched (or attemptedly fetched) target-price record.
///
/// A failed poll changes `fetch_status` only; the last known-good bucket,
/// payload and target price stay until a success replaces them wholesale or
/// a reconfiguration resets the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub bucket: Option<TimeBucket>,
    pub payload: Option<Value>,
    pub target_price: Option<f64>,
    pub fetch_status: FetchStatus,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            bucket: None,
            payload: None,
            target_price: None,
            fetch_status: FetchStatus::Ok,
        }
    }
}

/// Single mutable record behind the dashboard.
///
/// Owned by the session loop; every mutation goes through one of the
/// methods below, so each field has exactly one writer and the
/// reconfiguration transition is applied in full before control yields.
#[derive(Debug, Clone)]
pub struct SharedState {
    pub selection: Selection,
    pub live_price: Option<f64>,
    pub snapshot: Snapshot,
    pub stream_status: StreamStatus,
    pub is_configuring: bool,
}

impl SharedState {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            live_price: None,
            snapshot: Snapshot::empty(),
            stream_status: StreamStatus::Connecting,
            is_configuring: false,
        }
    }

    /// Record a stream tick. Ticks for any symbol other than the current
    /// selection's are dropped; they can arrive late from a subscription
    /// that was just replaced.
    pub fn record_price_tick(&mut self, symbol: &str, value: f64) {
        if symbol != self.selection.asset.stream_symbol() {
            debug!(symbol, "dropping tick for non-selected symbol");
            return;
        }
        self.live_price = Some(value);
    }

    pub fn set_stream_status(&mut self, status: StreamStatus) {
        self.stream_status = status;
    }

    /// Record the outcome of a snapshot poll issued for `selection` and
    /// `bucket`. Results for a selection the user has since left, and
    /// results landing mid-reconfiguration, are discarded.
    pub fn record_snapshot(
        &mut self,
        selection: Selection,
        bucket: TimeBucket,
        outcome: Result<Value, RestError>,
    ) {
        if self.is_configuring || selection != self.selection {
            debug!(%selection, "discarding snapshot for stale selection");
            return;
        }

        match outcome {
            Ok(payload) => {
                self.snapshot.target_price = extract_target_price(&payload);
                self.snapshot.bucket = Some(bucket);
                self.snapshot.payload = Some(payload);
                self.snapshot.fetch_status = FetchStatus::Ok;
            }
            Err(err) => {
                self.snapshot.fetch_status = FetchStatus::from(&err);
            }
        }
    }

    /// Enter the configuring window: poller writes and presenter reads are
    /// suspended until `apply_selection` completes the transition.
    pub fn begin_configuring(&mut self) {
        self.is_configuring = true;
    }

    /// The reconfiguration transition. The snapshot is reset wholesale; the
    /// live price survives a timeframe-only change but is cleared when the
    /// asset changes, so the old asset's price is never shown under the new
    /// header.
    pub fn apply_selection(&mut self, selection: Selection) {
        if selection.asset != self.selection.asset {
            self.live_price = None;
        }
        self.selection = selection;
        self.snapshot = Snapshot::empty();
        self.is_configuring = false;
    }
}
