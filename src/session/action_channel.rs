//! Action Channel for asynchronous event processing

use anyhow::Result;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::market_data::{Selection, TimeBucket};
use crate::vatic::RestError;

/// Events consumed by the session loop
#[derive(Debug)]
pub enum SessionEvent {
    /// Outcome of one snapshot poll, tagged with the selection and bucket
    /// the request was issued for
    SnapshotFetched {
        selection: Selection,
        bucket: TimeBucket,
        outcome: Result<Value, RestError>,
    },
    /// Shutdown request
    ShutdownRequested,
}

/// Action channel for event processing: producers clone the sender, the
/// session loop drains the receiver
pub struct ActionChannel {
    /// Event sender
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Event receiver
    event_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
}

impl ActionChannel {
    /// Create a new ActionChannel
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Send event to channel
    pub fn send_event(&self, event: SessionEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .map_err(|e| anyhow::anyhow!("Failed to send event: {}", e))
    }

    /// Get next event from channel
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        if let Some(event_rx) = &mut self.event_rx {
            event_rx.recv().await
        } else {
            None
        }
    }

    /// Get event sender for external use
    pub fn event_tx(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.event_tx.clone()
    }
}

impl Default for ActionChannel {
    fn default() -> Self {
        Self::new()
    }
}
