//! Render-surface abstraction.
//!
//! The chart-widget library is a black box behind these two traits: a surface
//! constructs instances, an instance accepts series data and level overlays.
//! The controller only ever talks to these traits, so the egui view can be
//! swapped for a recording double in tests.

use crate::market::object::CandleData;

use super::base::{ChartStyle, LevelLineStyle};

/// One live, surface-bound chart.
///
/// Owned exclusively by the controller. Once [`destroy`](ChartInstance::destroy)
/// has been called the instance accepts no further mutation.
pub trait ChartInstance {
    /// Populate the primary candlestick series, replacing any prior data.
    fn set_series_data(&mut self, candles: Vec<CandleData>);

    /// Add one horizontal price-level annotation.
    fn add_level_line(&mut self, price: f64, style: &LevelLineStyle);

    /// Fit the visible time range to the full loaded series.
    fn fit_visible_range(&mut self);

    /// Release the instance's rendering resources. Must be idempotent.
    fn destroy(&mut self);

    /// Whether [`destroy`](ChartInstance::destroy) has been called.
    fn is_destroyed(&self) -> bool;
}

/// Factory for chart instances on one display surface.
pub trait ChartSurface {
    type Instance: ChartInstance;

    /// Construct a fresh chart bound to this surface with the given fixed
    /// visual configuration.
    fn create_chart(&mut self, style: &ChartStyle) -> Self::Instance;
}
