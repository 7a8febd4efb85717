//! Egui-backed chart view: the live rendering object bound to the display
//! surface.
//!
//! One [`ChartView`] is one chart instance. It owns the loaded candle series
//! and level overlays, draws candles, grid and axes, and supports mouse-wheel
//! zoom and drag pan over the candle area.

use egui::{Pos2, Rect, Response, Sense, Stroke, StrokeKind, Ui};
use tracing::warn;

use crate::market::object::CandleData;

use super::base::{
    calculate_axis_ticks, format_price, to_color32, ChartStyle, LevelLineStyle, AXIS_X_HEIGHT,
    AXIS_Y_WIDTH, MARGIN, MIN_BAR_COUNT,
};
use super::item::{CandleItem, ChartItem, LevelLineItem};
use super::manager::CandleManager;
use super::surface::{ChartInstance, ChartSurface};

/// The live chart bound to the egui display surface.
pub struct ChartView {
    /// Data manager
    manager: CandleManager,
    /// Candlestick item
    candle_item: CandleItem,
    /// Horizontal level overlays
    level_lines: Vec<LevelLineItem>,
    /// Visual configuration, fixed at construction
    style: ChartStyle,
    /// Index one past the rightmost visible candle
    right_ix: usize,
    /// Number of visible candles
    bar_count: usize,
    /// Price decimal places
    price_decimals: usize,
    /// Resources released
    destroyed: bool,
}

impl ChartView {
    /// Create a view with the given fixed visual configuration.
    pub fn new(style: ChartStyle) -> Self {
        Self {
            manager: CandleManager::new(),
            candle_item: CandleItem::new(style.up_color, style.down_color),
            level_lines: Vec::new(),
            style,
            right_ix: 0,
            bar_count: 0,
            price_decimals: 2,
            destroyed: false,
        }
    }

    /// Number of loaded candles.
    pub fn candle_count(&self) -> usize {
        self.manager.get_count()
    }

    /// Number of level overlays.
    pub fn level_count(&self) -> usize {
        self.level_lines.len()
    }

    /// Currently visible candle range (inclusive), if any data is loaded.
    fn visible_range(&self) -> Option<(usize, usize)> {
        if self.manager.get_count() == 0 || self.bar_count == 0 {
            return None;
        }
        let max_ix = self.right_ix.min(self.manager.get_count());
        let min_ix = max_ix.saturating_sub(self.bar_count);
        Some((min_ix, max_ix.saturating_sub(1)))
    }

    /// Handle mouse wheel for zooming
    fn handle_scroll(&mut self, ui: &Ui, response: &Response) {
        if !response.hovered() {
            return;
        }
        let scroll_delta = ui.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            let count = self.manager.get_count();
            if scroll_delta.y > 0.0 {
                // Scroll up: zoom out (show more candles)
                self.bar_count = ((self.bar_count as f32 * 1.1) as usize).min(count);
            } else {
                // Scroll down: zoom in (show fewer candles)
                self.bar_count = ((self.bar_count as f32 / 1.1) as usize)
                    .max(MIN_BAR_COUNT.min(count));
            }
            self.right_ix = self.right_ix.clamp(self.bar_count, count);
        }
    }

    /// Handle mouse drag for panning
    fn handle_drag(&mut self, response: &Response, candle_rect: Rect) {
        if response.dragged() && self.bar_count > 0 {
            let delta = response.drag_delta();
            if delta.x != 0.0 {
                let bar_pixel_width = candle_rect.width() / self.bar_count as f32;
                let bar_delta = (-delta.x / bar_pixel_width) as i64;

                let count = self.manager.get_count();
                let new_right = (self.right_ix as i64 + bar_delta).max(0) as usize;
                self.right_ix = new_right.clamp(self.bar_count, count);
            }
        }
    }

    /// Show the chart. A destroyed view draws nothing.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, to_color32(self.style.background));

        if self.destroyed {
            return response;
        }

        let axis_x_height = if self.style.time_axis_visible {
            AXIS_X_HEIGHT
        } else {
            0.0
        };
        let candle_rect = Rect::from_min_max(
            Pos2::new(rect.left() + MARGIN, rect.top() + MARGIN),
            Pos2::new(
                rect.right() - MARGIN - AXIS_Y_WIDTH,
                rect.bottom() - MARGIN - axis_x_height,
            ),
        );

        self.handle_scroll(ui, &response);
        self.handle_drag(&response, candle_rect);

        let Some((min_ix, max_ix)) = self.visible_range() else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No data",
                egui::FontId::proportional(20.0),
                to_color32(self.style.grid_color),
            );
            return response;
        };

        // Price scale from the visible candles, with headroom
        let (price_min, price_max) = self
            .candle_item
            .get_y_range(&self.manager, Some(min_ix), Some(max_ix))
            .unwrap_or((0.0, 1.0));
        let price_padding = (price_max - price_min).max(f64::EPSILON) * 0.05;
        let price_min = price_min - price_padding;
        let price_max = price_max + price_padding;

        self.draw_grid(ui, candle_rect, min_ix, max_ix, price_min, price_max);

        self.candle_item
            .draw(ui, &self.manager, candle_rect, min_ix, max_ix, price_min, price_max);

        for line in &self.level_lines {
            line.draw(ui, &self.manager, candle_rect, min_ix, max_ix, price_min, price_max);
        }

        painter.rect_stroke(
            candle_rect,
            0.0,
            Stroke::new(1.0, to_color32(self.style.grid_color)),
            StrokeKind::Inside,
        );

        self.draw_y_axis(ui, candle_rect, price_min, price_max);
        if self.style.time_axis_visible {
            self.draw_x_axis(ui, candle_rect, min_ix, max_ix);
        }

        response
    }

    /// Draw grid lines at axis tick positions
    fn draw_grid(
        &self,
        ui: &Ui,
        candle_rect: Rect,
        min_ix: usize,
        max_ix: usize,
        price_min: f64,
        price_max: f64,
    ) {
        let painter = ui.painter();
        let grid = to_color32(self.style.grid_color).gamma_multiply(0.35);
        let stroke = Stroke::new(1.0, grid);

        for tick in calculate_axis_ticks(price_min, price_max, 5) {
            let normalized = (tick - price_min) / (price_max - price_min);
            let y = candle_rect.bottom() - (normalized as f32 * candle_rect.height());
            painter.line_segment(
                [
                    Pos2::new(candle_rect.left(), y),
                    Pos2::new(candle_rect.right(), y),
                ],
                stroke,
            );
        }

        for (x, _) in self.x_ticks(candle_rect, min_ix, max_ix) {
            painter.line_segment(
                [
                    Pos2::new(x, candle_rect.top()),
                    Pos2::new(x, candle_rect.bottom()),
                ],
                stroke,
            );
        }
    }

    /// Draw Y-axis with price tick labels
    fn draw_y_axis(&self, ui: &Ui, candle_rect: Rect, min_val: f64, max_val: f64) {
        let painter = ui.painter();

        for tick in calculate_axis_ticks(min_val, max_val, 5) {
            let normalized = (tick - min_val) / (max_val - min_val);
            let y = candle_rect.bottom() - (normalized as f32 * candle_rect.height());

            painter.line_segment(
                [
                    Pos2::new(candle_rect.right(), y),
                    Pos2::new(candle_rect.right() + 4.0, y),
                ],
                Stroke::new(1.0, to_color32(self.style.grid_color)),
            );

            painter.text(
                Pos2::new(candle_rect.right() + 6.0, y),
                egui::Align2::LEFT_CENTER,
                format_price(tick, self.price_decimals),
                egui::FontId::proportional(11.0),
                to_color32(self.style.text_color),
            );
        }
    }

    /// Draw X-axis with datetime labels
    fn draw_x_axis(&self, ui: &Ui, candle_rect: Rect, min_ix: usize, max_ix: usize) {
        let painter = ui.painter();

        for (x, ix) in self.x_ticks(candle_rect, min_ix, max_ix) {
            let Some(dt) = self.manager.get_datetime(ix) else {
                continue;
            };
            let y = candle_rect.bottom();

            painter.line_segment(
                [Pos2::new(x, y), Pos2::new(x, y + 4.0)],
                Stroke::new(1.0, to_color32(self.style.grid_color)),
            );

            painter.text(
                Pos2::new(x, y + 6.0),
                egui::Align2::CENTER_TOP,
                dt.format("%m-%d\n%H:%M").to_string(),
                egui::FontId::proportional(10.0),
                to_color32(self.style.text_color),
            );
        }
    }

    /// Screen X positions and candle indexes of the time-axis ticks
    fn x_ticks(&self, candle_rect: Rect, min_ix: usize, max_ix: usize) -> Vec<(f32, usize)> {
        let bar_count = max_ix - min_ix + 1;
        let num_ticks = ((candle_rect.width() / 120.0) as usize).max(2);
        let tick_step = (bar_count / num_ticks).max(1);

        let mut ticks = Vec::new();
        let mut ix = min_ix;
        while ix <= max_ix {
            let normalized = (ix - min_ix) as f32 / bar_count as f32;
            let x = candle_rect.left() + normalized * candle_rect.width();
            ticks.push((x, ix));
            ix += tick_step;
        }
        ticks
    }
}

impl ChartInstance for ChartView {
    fn set_series_data(&mut self, candles: Vec<CandleData>) {
        if self.destroyed {
            warn!("set_series_data called on a destroyed chart");
            return;
        }
        self.manager.set_history(candles);
    }

    fn add_level_line(&mut self, price: f64, style: &LevelLineStyle) {
        if self.destroyed {
            warn!("add_level_line called on a destroyed chart");
            return;
        }
        self.level_lines.push(LevelLineItem::new(price, style));
    }

    fn fit_visible_range(&mut self) {
        if self.destroyed {
            return;
        }
        let count = self.manager.get_count();
        self.right_ix = count;
        self.bar_count = count;
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.manager.clear_all();
        self.level_lines.clear();
        self.right_ix = 0;
        self.bar_count = 0;
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Factory producing [`ChartView`] instances on the egui surface.
#[derive(Default)]
pub struct EguiSurface;

impl ChartSurface for EguiSurface {
    type Instance = ChartView;

    fn create_chart(&mut self, style: &ChartStyle) -> ChartView {
        ChartView::new(style.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::base::{DEFAULT_CHART_STYLE, DEFAULT_LEVEL_STYLE};

    fn candle(time: f64) -> CandleData {
        CandleData {
            time,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
        }
    }

    #[test]
    fn test_fit_shows_full_series() {
        let mut view = ChartView::new(DEFAULT_CHART_STYLE);
        view.set_series_data((0..50).map(|i| candle(i as f64)).collect());
        view.fit_visible_range();

        assert_eq!(view.visible_range(), Some((0, 49)));
    }

    #[test]
    fn test_level_lines_accumulate_per_call() {
        let mut view = ChartView::new(DEFAULT_CHART_STYLE);
        assert_eq!(view.level_count(), 0);

        view.add_level_line(1.75, &DEFAULT_LEVEL_STYLE);
        view.add_level_line(2.25, &DEFAULT_LEVEL_STYLE);
        assert_eq!(view.level_count(), 2);
    }

    #[test]
    fn test_destroy_is_idempotent_and_blocks_mutation() {
        let mut view = ChartView::new(DEFAULT_CHART_STYLE);
        view.set_series_data(vec![candle(1.0)]);
        view.add_level_line(1.75, &DEFAULT_LEVEL_STYLE);

        view.destroy();
        assert!(view.is_destroyed());
        assert_eq!(view.candle_count(), 0);
        assert_eq!(view.level_count(), 0);

        // Further mutation is ignored
        view.set_series_data(vec![candle(2.0)]);
        view.add_level_line(3.0, &DEFAULT_LEVEL_STYLE);
        view.destroy();
        assert_eq!(view.candle_count(), 0);
        assert_eq!(view.level_count(), 0);
    }

    #[test]
    fn test_surface_creates_fresh_instances() {
        let mut surface = EguiSurface;
        let first = surface.create_chart(&DEFAULT_CHART_STYLE);
        let second = surface.create_chart(&DEFAULT_CHART_STYLE);
        assert_eq!(first.candle_count(), 0);
        assert_eq!(second.candle_count(), 0);
    }
}
