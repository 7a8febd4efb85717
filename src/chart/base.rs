//! Base constants, visual configuration, and utility functions for the chart
//! module.
//!
//! Colors are plain RGBA quadruplets so the chart configuration carries no
//! renderer dependency; the egui view converts them when drawing.

/// RGBA color
pub type Color = [u8; 4];

// Chart colors
pub const WHITE_COLOR: Color = [255, 255, 255, 255];
pub const BLACK_COLOR: Color = [0, 0, 0, 255];
pub const GREY_COLOR: Color = [100, 100, 100, 255];

// Price movement colors
pub const UP_COLOR: Color = [0x26, 0xa6, 0x9a, 255];
pub const DOWN_COLOR: Color = [0xef, 0x53, 0x50, 255];

// Support/resistance line color
pub const LEVEL_COLOR: Color = [0xbf, 0x00, 0xff, 255];

// Chart dimensions
pub const BAR_WIDTH: f32 = 0.3;
pub const MIN_BAR_COUNT: usize = 10;

// Layout constants
pub const MARGIN: f32 = 5.0;
pub const AXIS_X_HEIGHT: f32 = 32.0;
pub const AXIS_Y_WIDTH: f32 = 80.0;

/// Fixed visual configuration applied to every chart instance.
///
/// This is a static constant of the application, not user-configurable; it is
/// passed into the render surface when an instance is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub background: Color,
    pub text_color: Color,
    pub grid_color: Color,
    pub up_color: Color,
    pub down_color: Color,
    pub time_axis_visible: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        DEFAULT_CHART_STYLE
    }
}

/// Dark default: black background, white text, grey grid, teal/red candles.
pub const DEFAULT_CHART_STYLE: ChartStyle = ChartStyle {
    background: BLACK_COLOR,
    text_color: WHITE_COLOR,
    grid_color: GREY_COLOR,
    up_color: UP_COLOR,
    down_color: DOWN_COLOR,
    time_axis_visible: true,
};

/// Style of one horizontal level annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLineStyle {
    pub color: Color,
    pub width: f32,
    pub axis_label_visible: bool,
}

impl Default for LevelLineStyle {
    fn default() -> Self {
        DEFAULT_LEVEL_STYLE
    }
}

/// Default level style: magenta, width 2, no axis label.
pub const DEFAULT_LEVEL_STYLE: LevelLineStyle = LevelLineStyle {
    color: LEVEL_COLOR,
    width: 2.0,
    axis_label_visible: false,
};

/// Convert an RGBA quadruplet to an egui color.
#[cfg(feature = "gui")]
pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}

/// Convert a float value to integer with rounding
#[inline]
pub fn to_int(value: f64) -> i64 {
    value.round() as i64
}

/// Format price with appropriate precision
pub fn format_price(price: f64, decimals: usize) -> String {
    format!("{:.prec$}", price, prec = decimals)
}

/// Calculate nice axis tick values
pub fn calculate_axis_ticks(min_val: f64, max_val: f64, max_ticks: usize) -> Vec<f64> {
    if min_val >= max_val {
        return vec![min_val];
    }

    let range = max_val - min_val;
    let rough_step = range / max_ticks as f64;

    // Find the magnitude of the step
    let magnitude = 10.0_f64.powf(rough_step.log10().floor());
    let residual = rough_step / magnitude;

    // Choose a nice step value
    let nice_step = if residual <= 1.5 {
        magnitude
    } else if residual <= 3.0 {
        2.0 * magnitude
    } else if residual <= 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    };

    // Generate tick values
    let mut ticks = Vec::new();
    let start = (min_val / nice_step).ceil() * nice_step;
    let mut value = start;

    while value <= max_val {
        ticks.push(value);
        value += nice_step;
    }

    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_int() {
        assert_eq!(to_int(1.4), 1);
        assert_eq!(to_int(1.5), 2);
        assert_eq!(to_int(1.6), 2);
        assert_eq!(to_int(-1.5), -2);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1.75, 2), "1.75");
        assert_eq!(format_price(1.0, 4), "1.0000");
    }

    #[test]
    fn test_calculate_axis_ticks() {
        let ticks = calculate_axis_ticks(0.0, 100.0, 5);
        assert!(!ticks.is_empty());
        for tick in &ticks {
            assert!(*tick >= 0.0 && *tick <= 100.0);
        }
    }

    #[test]
    fn test_default_style_is_dark_with_visible_time_axis() {
        let style = ChartStyle::default();
        assert_eq!(style.background, BLACK_COLOR);
        assert!(style.time_axis_visible);
    }

    #[test]
    fn test_default_level_style_hides_axis_label() {
        let style = LevelLineStyle::default();
        assert_eq!(style.color, LEVEL_COLOR);
        assert_eq!(style.width, 2.0);
        assert!(!style.axis_label_visible);
    }
}
