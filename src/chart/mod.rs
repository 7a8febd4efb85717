//! Chart module: render-surface abstraction, the egui candlestick view, and
//! the chart lifecycle controller.
//!
//! This module provides:
//! - `ChartSurface` / `ChartInstance` - the black-box seam to the chart widget
//! - `ChartView` - egui candlestick rendering with level-line overlays
//! - `CandleManager` - data management for one loaded candle series
//! - `ChartController` - selection state, data refresh, and instance lifecycle

mod base;
mod controller;
mod manager;
mod surface;

#[cfg(feature = "gui")]
mod item;
#[cfg(feature = "gui")]
mod view;

pub use base::*;
pub use controller::{ChartController, ControllerState};
pub use manager::CandleManager;
pub use surface::{ChartInstance, ChartSurface};

#[cfg(feature = "gui")]
pub use item::{CandleItem, ChartItem, LevelLineItem};
#[cfg(feature = "gui")]
pub use view::{ChartView, EguiSurface};
