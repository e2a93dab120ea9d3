//! Loopback integration tests for the RTDS stream client

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

use targetwatch::polymarket::{RtdsStream, StreamEvent};

const RECONNECT: Duration = Duration::from_millis(50);
const WAIT: Duration = Duration::from_secs(5);

async fn accept_client(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (socket, _) = timeout(WAIT, listener.accept())
        .await
        .expect("accept timeout")
        .expect("accept failed");
    accept_async(socket).await.expect("handshake failed")
}

async fn read_subscribe(server: &mut WebSocketStream<TcpStream>) -> Value {
    loop {
        let message = timeout(WAIT, server.next())
            .await
            .expect("subscribe timeout")
            .expect("connection closed before subscribe")
            .expect("frame error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("subscribe frame is json");
        }
    }
}

async fn next_event(events: &mut mpsc::UnboundedReceiver<StreamEvent>) -> StreamEvent {
    timeout(WAIT, events.recv())
        .await
        .expect("event timeout")
        .expect("event channel closed")
}

fn tick_frame(symbol: &str, value: f64) -> Message {
    Message::Text(
        json!({
            "topic": "crypto_prices_chainlink",
            "payload": { "symbol": symbol, "value": value }
        })
        .to_string(),
    )
}

#[tokio::test]
async fn subscribes_and_delivers_matching_ticks() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (mut stream, mut events) = RtdsStream::new(url, RECONNECT);

    stream.connect("btc/usd").await.unwrap();
    let mut server = accept_client(&listener).await;

    let subscribe = read_subscribe(&mut server).await;
    assert_eq!(subscribe["action"], "subscribe");
    assert_eq!(
        subscribe["subscriptions"][0]["topic"],
        "crypto_prices_chainlink"
    );
    let filters: Value =
        serde_json::from_str(subscribe["subscriptions"][0]["filters"].as_str().unwrap()).unwrap();
    assert_eq!(filters["symbol"], "btc/usd");

    assert!(matches!(
        next_event(&mut events).await,
        StreamEvent::Connected { .. }
    ));

    // malformed and off-symbol frames are dropped without breaking the pump
    server
        .send(Message::Text("not json".to_string()))
        .await
        .unwrap();
    server.send(tick_frame("eth/usd", 1.0)).await.unwrap();
    server.send(tick_frame("btc/usd", 97000.25)).await.unwrap();

    match next_event(&mut events).await {
        StreamEvent::Tick(tick) => {
            assert_eq!(tick.symbol, "btc/usd");
            assert_eq!(tick.value, 97000.25);
        }
        other => panic!("expected tick, got {other:?}"),
    }

    stream.disconnect().await;
}

#[tokio::test]
async fn reconnects_after_server_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (mut stream, mut events) = RtdsStream::new(url, RECONNECT);

    stream.connect("btc/usd").await.unwrap();
    let mut server = accept_client(&listener).await;
    read_subscribe(&mut server).await;
    assert!(matches!(
        next_event(&mut events).await,
        StreamEvent::Connected { .. }
    ));

    // hard-drop the connection; the client must come back on its own
    drop(server);
    assert!(matches!(
        next_event(&mut events).await,
        StreamEvent::Disconnected { .. }
    ));

    let mut server = accept_client(&listener).await;
    let subscribe = read_subscribe(&mut server).await;
    let filters: Value =
        serde_json::from_str(subscribe["subscriptions"][0]["filters"].as_str().unwrap()).unwrap();
    assert_eq!(filters["symbol"], "btc/usd");
    assert!(matches!(
        next_event(&mut events).await,
        StreamEvent::Connected { .. }
    ));

    stream.disconnect().await;
}

#[tokio::test]
async fn switching_symbol_terminates_previous_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (mut stream, mut events) = RtdsStream::new(url, RECONNECT);

    stream.connect("btc/usd").await.unwrap();
    let mut server_btc = accept_client(&listener).await;
    read_subscribe(&mut server_btc).await;
    assert!(matches!(
        next_event(&mut events).await,
        StreamEvent::Connected { .. }
    ));

    // connect returns only after the old reader task has terminated
    stream.connect("eth/usd").await.unwrap();
    assert_eq!(stream.subscribed_symbol(), Some("eth/usd"));

    let old_closed = timeout(WAIT, async {
        loop {
            match server_btc.next().await {
                None | Some(Ok(Message::Close(_))) | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(old_closed.is_ok(), "previous connection was not closed");

    let mut server_eth = accept_client(&listener).await;
    let subscribe = read_subscribe(&mut server_eth).await;
    let filters: Value =
        serde_json::from_str(subscribe["subscriptions"][0]["filters"].as_str().unwrap()).unwrap();
    assert_eq!(filters["symbol"], "eth/usd");

    match next_event(&mut events).await {
        StreamEvent::Connected { symbol } => assert_eq!(symbol, "eth/usd"),
        other => panic!("expected connected event, got {other:?}"),
    }

    // reconnecting to the same symbol is a no-op
    stream.connect("eth/usd").await.unwrap();
    assert_eq!(stream.subscribed_symbol(), Some("eth/usd"));

    stream.disconnect().await;
}
