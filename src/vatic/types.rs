//! Vatic targets API data types

use serde_json::Value;

/// Error types for snapshot fetches
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("rate limited")]
    RateLimited,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// Resolve the target price from a snapshot payload.
///
/// Field preference order: `target_price`, then `target`, then `price`.
/// The first present, non-null field wins and is not reconsidered even if
/// it fails to parse as a number; numbers and numeric strings are both
/// accepted. `None` when no candidate field is present.
pub fn extract_target_price(payload: &Value) -> Option<f64> {
    ["target_price", "target", "price"]
        .iter()
        .find_map(|field| payload.get(*field).filter(|value| !value.is_null()))
        .and_then(numeric_field)
}

fn numeric_field(value: &Value) -> Option<f64> {
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
    fn test_target_price_wins_over_all() {
        let payload = json!({ "target_price": 5, "target": 9, "price": 1 });
        assert_eq!(extract_target_price(&payload), Some(5.0));
    }

    #[test]
    fn test_target_wins_over_price() {
        let payload = json!({ "target": 9, "price": 1 });
        assert_eq!(extract_target_price(&payload), Some(9.0));
    }

    #[test]
    fn test_price_is_last_resort() {
        let payload = json!({ "price": 1 });
        assert_eq!(extract_target_price(&payload), Some(1.0));
    }

    #[test]
    fn test_empty_payload_yields_none() {
        assert_eq!(extract_target_price(&json!({})), None);
        assert_eq!(extract_target_price(&json!({ "utc_date": "2024-01-01" })), None);
    }

    #[test]
    fn test_null_fields_are_skipped() {
        let payload = json!({ "target_price": null, "target": 9 });
        assert_eq!(extract_target_price(&payload), Some(9.0));

        let payload = json!({ "target_price": null, "target": null, "price": null });
        assert_eq!(extract_target_price(&payload), None);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let payload = json!({ "target_price": "97250.5" });
        assert_eq!(extract_target_price(&payload), Some(97250.5));
    }

    #[test]
    fn test_non_numeric_winner_yields_none() {
        let payload = json!({ "target_price": {"nested": true}, "price": 1 });
        assert_eq!(extract_target_price(&payload), None);
    }
}
