//! Datafeed module for querying the chart data backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use super::object::{ChartData, ChartRequest};
use super::setting::SETTINGS;

/// Errors returned by a chart data source.
#[derive(Debug, Error)]
pub enum DatafeedError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected http status: {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Abstract data source serving candle series and support/resistance levels.
#[async_trait]
pub trait ChartDataSource: Send + Sync {
    /// Query the candle series and level set for one selection.
    async fn query_chart_data(&self, req: &ChartRequest) -> Result<ChartData, DatafeedError>;
}

/// Datafeed backed by the trade REST API.
pub struct RestDatafeed {
    client: Client,
    base_url: String,
}

impl RestDatafeed {
    /// Create a datafeed client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DatafeedError> {
        let timeout = SETTINGS.get_int("api.timeout").unwrap_or(30) as u64;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create a datafeed client from the global settings.
    pub fn from_settings() -> Result<Self, DatafeedError> {
        let base_url = SETTINGS
            .get_string("api.base_url")
            .unwrap_or_else(|| "http://localhost:8081".to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChartDataSource for RestDatafeed {
    async fn query_chart_data(&self, req: &ChartRequest) -> Result<ChartData, DatafeedError> {
        let url = format!("{}/api/trade", self.base_url);
        debug!("querying chart data: {} {} {}", url, req.symbol, req.timeframe);

        let response = self.client.post(&url).json(req).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatafeedError::Status(status));
        }

        // Decode from raw bytes so a malformed body is reported as a decode
        // failure rather than folded into the transport error.
        let body = response.bytes().await?;
        let data: ChartData = serde_json::from_slice(&body)?;
        Ok(data)
    }
}

/// Datafeed serving a fixed response, for offline runs and tests.
pub struct StaticDatafeed {
    data: ChartData,
}

impl StaticDatafeed {
    pub fn new(data: ChartData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl ChartDataSource for StaticDatafeed {
    async fn query_chart_data(&self, _req: &ChartRequest) -> Result<ChartData, DatafeedError> {
        Ok(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::constant::Timeframe;
    use crate::market::object::CandleData;

    #[tokio::test]
    async fn test_static_datafeed() {
        let data = ChartData {
            candles: vec![CandleData {
                time: 1.0,
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
            }],
            levels: vec![1.75],
        };
        let datafeed = StaticDatafeed::new(data.clone());

        let req = ChartRequest::new("/ES=F", Timeframe::Minute5);
        let result = datafeed.query_chart_data(&req).await.unwrap();
        assert_eq!(result, data);
    }

    #[tokio::test]
    async fn test_rest_datafeed_transport_error() {
        // Nothing listens on this port; the request must fail as a transport
        // error, not a panic.
        let datafeed = RestDatafeed::new("http://127.0.0.1:1").unwrap();
        let req = ChartRequest::new("/ES=F", Timeframe::Minute5);
        let result = datafeed.query_chart_data(&req).await;
        assert!(matches!(result, Err(DatafeedError::Transport(_))));
    }

    #[test]
    fn test_base_url_kept_verbatim() {
        let datafeed = RestDatafeed::new("http://example.com:9000").unwrap();
        assert_eq!(datafeed.base_url(), "http://example.com:9000");
    }
}
