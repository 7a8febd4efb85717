//! Trade Chart - a desktop candlestick charting client.
//!
//! This crate fetches historical price data for a selected symbol and
//! timeframe from a backend service and renders it as a candlestick chart
//! annotated with horizontal support/resistance lines. It provides:
//!
//! - Wire data model and datafeed client for the chart backend
//! - A render-surface abstraction with an egui implementation (`gui` feature)
//! - The chart lifecycle controller that owns the selection, the requests,
//!   and the one live chart instance
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trade_chart::chart::{ChartController, EguiSurface};
//! use trade_chart::market::RestDatafeed;
//!
//! #[tokio::main]
//! async fn main() {
//!     let datafeed = Arc::new(RestDatafeed::from_settings().unwrap());
//!     let mut controller = ChartController::new(
//!         EguiSurface,
//!         datafeed,
//!         tokio::runtime::Handle::current(),
//!     );
//!     controller.initialize();
//! }
//! ```

pub mod chart;
pub mod market;

#[cfg(feature = "gui")]
pub mod ui;

// Re-export commonly used types
pub use chart::{
    ChartController, ChartInstance, ChartStyle, ChartSurface, ControllerState, LevelLineStyle,
};
pub use market::{
    CandleData, ChartData, ChartDataSource, ChartRequest, DatafeedError, RestDatafeed, Selection,
    Timeframe,
};

#[cfg(feature = "gui")]
pub use chart::{ChartView, EguiSurface};
#[cfg(feature = "gui")]
pub use ui::ChartApp;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
