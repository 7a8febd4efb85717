//! Chart items for rendering candlesticks and horizontal level lines.

use egui::{Pos2, Rect, Stroke, Ui};

use super::base::{to_color32, LevelLineStyle, BAR_WIDTH, DOWN_COLOR, UP_COLOR};
use super::manager::CandleManager;

/// Convert a price to a screen Y coordinate inside `rect`.
pub(super) fn price_to_y(price: f64, rect: Rect, y_min: f64, y_max: f64) -> f32 {
    let y_range = y_max - y_min;
    if y_range == 0.0 {
        return rect.center().y;
    }
    let normalized = (price - y_min) / y_range;
    rect.bottom() - (normalized as f32 * rect.height())
}

/// Convert a candle index to the screen X coordinate of its bar center.
pub(super) fn index_to_x(ix: usize, rect: Rect, min_ix: usize, max_ix: usize) -> f32 {
    let bar_count = (max_ix - min_ix + 1) as f32;
    let bar_width = rect.width() / bar_count;
    rect.left() + (ix - min_ix) as f32 * bar_width + bar_width * 0.5
}

/// Trait for chart items that can be drawn over the candle area.
pub trait ChartItem {
    /// Y-axis range this item contributes to autoscaling, if any.
    fn get_y_range(
        &self,
        manager: &CandleManager,
        min_ix: Option<usize>,
        max_ix: Option<usize>,
    ) -> Option<(f64, f64)>;

    /// Draw the item.
    fn draw(
        &self,
        ui: &Ui,
        manager: &CandleManager,
        rect: Rect,
        min_ix: usize,
        max_ix: usize,
        y_min: f64,
        y_max: f64,
    );
}

/// Candlestick series item: solid borderless bodies, wick in the body color.
pub struct CandleItem {
    up_color: egui::Color32,
    down_color: egui::Color32,
}

impl Default for CandleItem {
    fn default() -> Self {
        Self::new(UP_COLOR, DOWN_COLOR)
    }
}

impl CandleItem {
    pub fn new(up_color: super::base::Color, down_color: super::base::Color) -> Self {
        Self {
            up_color: to_color32(up_color),
            down_color: to_color32(down_color),
        }
    }
}

impl ChartItem for CandleItem {
    fn get_y_range(
        &self,
        manager: &CandleManager,
        min_ix: Option<usize>,
        max_ix: Option<usize>,
    ) -> Option<(f64, f64)> {
        if manager.get_count() == 0 {
            return None;
        }
        Some(manager.get_price_range(min_ix, max_ix))
    }

    fn draw(
        &self,
        ui: &Ui,
        manager: &CandleManager,
        rect: Rect,
        min_ix: usize,
        max_ix: usize,
        y_min: f64,
        y_max: f64,
    ) {
        let painter = ui.painter();
        let bar_count = (max_ix - min_ix + 1) as f32;
        let bar_pixel_width = rect.width() / bar_count;
        let candle_width = (bar_pixel_width * BAR_WIDTH * 2.0).max(1.0);

        for ix in min_ix..=max_ix {
            let Some(candle) = manager.get_candle(ix) else {
                continue;
            };

            let x = index_to_x(ix, rect, min_ix, max_ix);
            let color = if candle.close >= candle.open {
                self.up_color
            } else {
                self.down_color
            };
            let stroke = Stroke::new(1.0, color);

            // Wick
            let high_y = price_to_y(candle.high, rect, y_min, y_max);
            let low_y = price_to_y(candle.low, rect, y_min, y_max);
            painter.line_segment([Pos2::new(x, high_y), Pos2::new(x, low_y)], stroke);

            // Body
            let open_y = price_to_y(candle.open, rect, y_min, y_max);
            let close_y = price_to_y(candle.close, rect, y_min, y_max);

            if (open_y - close_y).abs() < 1.0 {
                // Doji: a flat body collapses to a horizontal line
                painter.line_segment(
                    [
                        Pos2::new(x - candle_width * 0.5, open_y),
                        Pos2::new(x + candle_width * 0.5, open_y),
                    ],
                    stroke,
                );
            } else {
                let body_rect = Rect::from_min_max(
                    Pos2::new(x - candle_width * 0.5, open_y.min(close_y)),
                    Pos2::new(x + candle_width * 0.5, open_y.max(close_y)),
                );
                painter.rect_filled(body_rect, 0.0, color);
            }
        }
    }
}

/// One horizontal support/resistance line overlay.
pub struct LevelLineItem {
    pub price: f64,
    stroke: Stroke,
}

impl LevelLineItem {
    pub fn new(price: f64, style: &LevelLineStyle) -> Self {
        Self {
            price,
            stroke: Stroke::new(style.width, to_color32(style.color)),
        }
    }
}

impl ChartItem for LevelLineItem {
    fn get_y_range(
        &self,
        _manager: &CandleManager,
        _min_ix: Option<usize>,
        _max_ix: Option<usize>,
    ) -> Option<(f64, f64)> {
        // Overlay only: level lines do not participate in price autoscaling.
        None
    }

    fn draw(
        &self,
        ui: &Ui,
        _manager: &CandleManager,
        rect: Rect,
        _min_ix: usize,
        _max_ix: usize,
        y_min: f64,
        y_max: f64,
    ) {
        if self.price < y_min || self.price > y_max {
            return;
        }

        let y = price_to_y(self.price, rect, y_min, y_max);
        ui.painter().line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            self.stroke,
        );
    }
}
