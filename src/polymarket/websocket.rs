//! Polymarket RTDS WebSocket client

use std::time::Duration;

use anyhow::Result;
use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use tracing::{debug, info, warn};

use super::types::{StreamEvent, SubscribeRequest, parse_tick};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Live price stream for the currently selected symbol.
///
/// Holds at most one subscription. `connect` tears the previous reader task
/// down and waits for it to exit before spawning the next one, so a symbol
/// switch can never leave two connections pushing ticks. Within one
/// subscription the reader reconnects on its own after a fixed delay,
/// indefinitely.
pub struct RtdsStream {
    ws_url: String,
    reconnect_delay: Duration,
    event_tx: mpsc::UnboundedSender<StreamEvent>,
    active: Option<ActiveSubscription>,
}

struct ActiveSubscription {
    symbol: String,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl RtdsStream {
    /// Create a new RTDS client; events arrive on the returned receiver
    pub fn new(
        ws_url: impl Into<String>,
        reconnect_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let stream = Self {
            ws_url: ws_url.into(),
            reconnect_delay,
            event_tx,
            active: None,
        };

        (stream, event_rx)
    }

    /// Symbol of the current subscription, if any
    pub fn subscribed_symbol(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.symbol.as_str())
    }

    /// Subscribe to `symbol`. No-op when already subscribed to it;
    /// otherwise any existing subscription is fully terminated first.
    pub async fn connect(&mut self, symbol: &str) -> Result<()> {
        if let Some(active) = &self.active {
            if active.symbol == symbol {
                debug!(symbol, "already subscribed");
                return Ok(());
            }
        }

        self.disconnect().await;

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(run_subscription(
            self.ws_url.clone(),
            symbol.to_string(),
            self.reconnect_delay,
            self.event_tx.clone(),
            shutdown_rx,
        ));

        self.active = Some(ActiveSubscription {
            symbol: symbol.to_string(),
            shutdown_tx,
            task,
        });
        info!(symbol, "stream subscription started");
        Ok(())
    }

    /// Terminate the current subscription and wait for its task to exit
    pub async fn disconnect(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.shutdown_tx.send(()).await;
            if let Err(e) = active.task.await {
                warn!(symbol = %active.symbol, "stream task join error: {e}");
            }
            info!(symbol = %active.symbol, "stream subscription terminated");
        }
    }
}

/// Why the message pump stopped
#[derive(PartialEq)]
enum PumpExit {
    Shutdown,
    Closed,
}

/// Connection lifecycle for one subscription generation: connect, send the
/// subscribe frame, pump messages, and on any close or transport error
/// retry after the fixed delay until told to shut down.
async fn run_subscription(
    url: String,
    symbol: String,
    reconnect_delay: Duration,
    event_tx: mpsc::UnboundedSender<StreamEvent>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    loop {
        let connected = tokio::select! {
            _ = shutdown_rx.recv() => return,
            connected = connect_async(&url) => connected,
        };

        match connected {
            Ok((ws, _)) => {
                if pump_messages(ws, &symbol, &event_tx, &mut shutdown_rx).await
                    == PumpExit::Shutdown
                {
                    return;
                }
                let _ = event_tx.send(StreamEvent::Disconnected {
                    symbol: symbol.clone(),
                });
            }
            Err(e) => {
                warn!(symbol = %symbol, "stream connect failed: {e}");
                let _ = event_tx.send(StreamEvent::Disconnected {
                    symbol: symbol.clone(),
                });
            }
        }

        tokio::select! {
            _ = shutdown_rx.recv() => return,
            _ = sleep(reconnect_delay) => {}
        }
    }
}

async fn pump_messages(
    mut ws: WsStream,
    symbol: &str,
    event_tx: &mpsc::UnboundedSender<StreamEvent>,
    shutdown_rx: &mut mpsc::Receiver<()>,
) -> PumpExit {
    let subscribe = match serde_json::to_string(&SubscribeRequest::for_symbol(symbol)) {
        Ok(text) => text,
        Err(e) => {
            warn!(symbol, "failed to encode subscribe frame: {e}");
            return PumpExit::Closed;
        }
    };

    if let Err(e) = ws.send(Message::Text(subscribe)).await {
        warn!(symbol, "subscribe send failed: {e}");
        return PumpExit::Closed;
    }
    let _ = event_tx.send(StreamEvent::Connected {
        symbol: symbol.to_string(),
    });

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                let _ = ws.close(None).await;
                return PumpExit::Shutdown;
            }
            message = ws.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match parse_tick(&text, symbol) {
                        Some(tick) => {
                            let _ = event_tx.send(StreamEvent::Tick(tick));
                        }
                        None => debug!(symbol, "dropping unusable frame"),
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    let _ = ws.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!(symbol, "stream closed by server");
                    return PumpExit::Closed;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(symbol, "stream transport error: {e}");
                    return PumpExit::Closed;
                }
            }
        }
    }
}
