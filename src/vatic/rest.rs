//! Vatic targets REST API client implementation

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::types::RestError;
use crate::market_data::{Asset, TimeBucket, Timeframe};

/// Client for the target-price snapshot endpoint
#[derive(Debug, Clone)]
pub struct TargetsClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl TargetsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the target-price record for `asset` in `bucket` of
    /// `timeframe`. One outbound request per call; retry cadence is owned
    /// by the caller's poll timer.
    pub async fn fetch_target(
        &self,
        asset: Asset,
        timeframe: Timeframe,
        bucket: TimeBucket,
    ) -> Result<Value, RestError> {
        let url = format!(
            "{}/api/v1/targets/timestamp?asset={}&type={}&timestamp={}",
            self.base_url,
            asset.api_name(),
            timeframe.api_type(),
            bucket.start_epoch()
        );

        debug!(%url, "fetching target snapshot");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RestError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(RestError::RateLimited);
        }
        if !status.is_success() {
            return Err(RestError::Status(status.as_u16()));
        }

        // an unparseable body is indistinguishable from a truncated response
        response
            .json::<Value>()
            .await
            .map_err(|e| RestError::Network(e.to_string()))
    }
}
