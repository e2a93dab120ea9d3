//! Polymarket RTDS wire types

use serde::Serialize;
use serde_json::Value;

/// Topic carrying chainlink price updates
pub const CRYPTO_PRICES_TOPIC: &str = "crypto_prices_chainlink";

/// Subscription request sent once the socket opens
#[derive(Debug, Serialize)]
pub struct SubscribeRequest {
    pub action: String,
    pub subscriptions: Vec<SubscriptionEntry>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionEntry {
    pub topic: String,
    #[serde(rename = "type")]
    pub message_type: String,
    /// JSON-encoded filter object, e.g. `{"symbol":"btc/usd"}`
    pub filters: String,
}

impl SubscribeRequest {
    /// Subscribe to chainlink prices for one symbol, filtered server-side
    pub fn for_symbol(symbol: &str) -> Self {
        Self {
            action: "subscribe".to_string(),
            subscriptions: vec![SubscriptionEntry {
                topic: CRYPTO_PRICES_TOPIC.to_string(),
                message_type: "*".to_string(),
                filters: serde_json::json!({ "symbol": symbol }).to_string(),
            }],
        }
    }
}

/// One price update decoded from a stream frame
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub symbol: String,
    pub value: f64,
}

/// Events emitted by the stream reader task
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Connected { symbol: String },
    Tick(PriceTick),
    Disconnected { symbol: String },
}

/// Decode a text frame into a tick for `symbol`.
///
/// Returns `None` for malformed frames, other topics, other symbols and
/// non-numeric values; the caller drops those without further handling.
pub fn parse_tick(text: &str, symbol: &str) -> Option<PriceTick> {
    let frame: Value = serde_json::from_str(text).ok()?;
    if frame.get("topic")?.as_str()? != CRYPTO_PRICES_TOPIC {
        return None;
    }
    let payload = frame.get("payload")?;
    if payload.get("symbol")?.as_str()? != symbol {
        return None;
    }
    let value = numeric_value(payload.get("value")?)?;
    Some(PriceTick {
        symbol: symbol.to_string(),
        value,
    })
}

/// The feed has carried prices both as JSON numbers and as numeric strings
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscribe_frame_shape() {
        let request = SubscribeRequest::for_symbol("btc/usd");
        let encoded = serde_json::to_value(&request).unwrap();

        assert_eq!(encoded["action"], "subscribe");
        assert_eq!(encoded["subscriptions"][0]["topic"], CRYPTO_PRICES_TOPIC);
        assert_eq!(encoded["subscriptions"][0]["type"], "*");

        // filters is itself a JSON-encoded string
        let filters: Value =
            serde_json::from_str(encoded["subscriptions"][0]["filters"].as_str().unwrap()).unwrap();
        assert_eq!(filters, json!({ "symbol": "btc/usd" }));
    }

    #[test]
    fn test_parse_tick_accepts_matching_frame() {
        let frame = json!({
            "topic": CRYPTO_PRICES_TOPIC,
            "payload": { "symbol": "btc/usd", "value": 97123.45 }
        })
        .to_string();

        let tick = parse_tick(&frame, "btc/usd").unwrap();
        assert_eq!(tick.symbol, "btc/usd");
        assert_eq!(tick.value, 97123.45);
    }

    #[test]
    fn test_parse_tick_accepts_numeric_string_value() {
        let frame = json!({
            "topic": CRYPTO_PRICES_TOPIC,
            "payload": { "symbol": "btc/usd", "value": "97123.45" }
        })
        .to_string();

        let tick = parse_tick(&frame, "btc/usd").unwrap();
        assert_eq!(tick.value, 97123.45);
    }

    #[test]
    fn test_parse_tick_drops_other_topic() {
        let frame = json!({
            "topic": "comments",
            "payload": { "symbol": "btc/usd", "value": 1.0 }
        })
        .to_string();

        assert_eq!(parse_tick(&frame, "btc/usd"), None);
    }

    #[test]
    fn test_parse_tick_drops_other_symbol() {
        let frame = json!({
            "topic": CRYPTO_PRICES_TOPIC,
            "payload": { "symbol": "eth/usd", "value": 1.0 }
        })
        .to_string();

        assert_eq!(parse_tick(&frame, "btc/usd"), None);
    }

    #[test]
    fn test_parse_tick_drops_malformed_frames() {
        assert_eq!(parse_tick("not json at all", "btc/usd"), None);
        assert_eq!(parse_tick("{\"topic\": 42}", "btc/usd"), None);
        assert_eq!(
            parse_tick(&json!({ "topic": CRYPTO_PRICES_TOPIC }).to_string(), "btc/usd"),
            None
        );

        let no_value = json!({
            "topic": CRYPTO_PRICES_TOPIC,
            "payload": { "symbol": "btc/usd", "value": true }
        })
        .to_string();
        assert_eq!(parse_tick(&no_value, "btc/usd"), None);
    }
}
