//! Data model and platform plumbing for the charting client.

pub mod constant;
pub mod datafeed;
pub mod logger;
pub mod object;
pub mod setting;
pub mod utility;

pub use constant::{is_valid_symbol, Timeframe, DEFAULT_SYMBOL, DEFAULT_TIMEFRAME, SYMBOLS};
pub use datafeed::{ChartDataSource, DatafeedError, RestDatafeed, StaticDatafeed};
pub use object::{CandleData, ChartData, ChartRequest, Selection};
pub use setting::{SettingValue, Settings, SETTINGS};
