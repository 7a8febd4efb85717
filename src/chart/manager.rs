//! Candle data manager for the chart module.
//!
//! Holds one loaded candle series in the order the backend delivered it and
//! provides index lookup and price range queries for drawing. The series is
//! replaced wholesale on every load, never mutated in place.

use chrono::{DateTime, Utc};

use crate::market::object::CandleData;

/// Manages the loaded candle series with index-based lookup.
pub struct CandleManager {
    /// Candles in backend order (chronological as received)
    candles: Vec<CandleData>,
    /// Price range over the full series, computed once per load
    full_range: Option<(f64, f64)>,
}

impl Default for CandleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CandleManager {
    /// Create a new CandleManager
    pub fn new() -> Self {
        Self {
            candles: Vec::new(),
            full_range: None,
        }
    }

    /// Replace the series with a freshly loaded one.
    pub fn set_history(&mut self, candles: Vec<CandleData>) {
        self.candles = candles;
        self.full_range = Self::range_of(&self.candles);
    }

    /// Remove all data.
    pub fn clear_all(&mut self) {
        self.candles.clear();
        self.full_range = None;
    }

    /// Get total number of candles
    pub fn get_count(&self) -> usize {
        self.candles.len()
    }

    /// Get candle data for an index
    pub fn get_candle(&self, ix: usize) -> Option<&CandleData> {
        self.candles.get(ix)
    }

    /// Get all candle data
    pub fn get_all_candles(&self) -> &[CandleData] {
        &self.candles
    }

    /// Get datetime for an index
    pub fn get_datetime(&self, ix: usize) -> Option<DateTime<Utc>> {
        self.candles.get(ix).and_then(|c| c.datetime())
    }

    /// Get price range for a given index range (inclusive).
    pub fn get_price_range(&self, min_ix: Option<usize>, max_ix: Option<usize>) -> (f64, f64) {
        if self.candles.is_empty() {
            return (0.0, 1.0);
        }

        let last = self.candles.len() - 1;
        let min_ix = min_ix.unwrap_or(0);
        let max_ix = max_ix.unwrap_or(last).min(last);

        if min_ix > max_ix {
            return (0.0, 1.0);
        }

        if min_ix == 0 && max_ix == last {
            if let Some(range) = self.full_range {
                return range;
            }
        }

        Self::range_of(&self.candles[min_ix..=max_ix]).unwrap_or((0.0, 1.0))
    }

    fn range_of(candles: &[CandleData]) -> Option<(f64, f64)> {
        let first = candles.first()?;
        let mut min_price = first.low;
        let mut max_price = first.high;

        for candle in &candles[1..] {
            min_price = min_price.min(candle.low);
            max_price = max_price.max(candle.high);
        }

        Some((min_price, max_price))
    }
}
