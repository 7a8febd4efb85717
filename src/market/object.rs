//! Basic data structures exchanged with the chart data backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::constant::{Timeframe, DEFAULT_SYMBOL, DEFAULT_TIMEFRAME};

/// One OHLC candle for a time bucket, exactly as the backend sends it.
///
/// `time` is a unix timestamp in seconds. The backend bakes the exchange
/// timezone offset into the value so the chart can label buckets in local
/// market time; it is passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleData {
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl CandleData {
    /// Interpret the timestamp as a UTC datetime for axis labels.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time as i64, 0)
    }
}

/// Response payload of the chart data backend: the candle series for the
/// requested selection plus the support/resistance levels to overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub candles: Vec<CandleData>,
    #[serde(rename = "s_r")]
    pub levels: Vec<f64>,
}

/// Request payload sent to the chart data backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl ChartRequest {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}

/// The user's current symbol/timeframe choice, held by the controller and
/// snapshotted into a [`ChartRequest`] at refresh time.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl Selection {
    /// Snapshot this selection into a request payload.
    pub fn to_request(&self) -> ChartRequest {
        ChartRequest::new(self.symbol.clone(), self.timeframe)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            timeframe: DEFAULT_TIMEFRAME,
        }
    }
}
