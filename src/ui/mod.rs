//! Application shell: selector panel plus chart area.
//!
//! The shell owns the controller and drives its lifecycle deterministically:
//! `initialize()` at creation, `poll()` every frame, `teardown()` on exit.
//! Selection changes only mutate state; a request goes out when the user
//! presses Update.

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::chart::{ChartController, EguiSurface};
use crate::market::constant::{Timeframe, SYMBOLS};
use crate::market::datafeed::{DatafeedError, RestDatafeed};

/// Main application state.
pub struct ChartApp {
    controller: ChartController<EguiSurface>,
}

impl ChartApp {
    /// Create the application, wire the datafeed from global settings, and
    /// issue the initial data request.
    ///
    /// Must be called from within the tokio runtime context so the controller
    /// can dispatch requests.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, DatafeedError> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let datafeed = Arc::new(RestDatafeed::from_settings()?);
        let mut controller = ChartController::new(
            EguiSurface,
            datafeed,
            tokio::runtime::Handle::current(),
        );
        controller.initialize();

        Ok(Self { controller })
    }

    fn selector_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.heading("Select Symbol");
        ui.separator();

        let current_symbol = self.controller.selection().symbol.clone();
        egui::ComboBox::from_label("Symbol")
            .selected_text(&current_symbol)
            .show_ui(ui, |ui| {
                for symbol in SYMBOLS {
                    if ui.selectable_label(current_symbol == symbol, symbol).clicked() {
                        self.controller.set_symbol(symbol);
                    }
                }
            });

        let current_tf = self.controller.selection().timeframe;
        egui::ComboBox::from_label("Timeframe")
            .selected_text(current_tf.display_name())
            .show_ui(ui, |ui| {
                for tf in Timeframe::all() {
                    if ui
                        .selectable_label(current_tf == tf, tf.display_name())
                        .clicked()
                    {
                        self.controller.set_timeframe(tf);
                    }
                }
            });

        ui.add_space(8.0);
        if ui.button("Update").clicked() {
            self.controller.refresh();
        }

        ui.separator();
        self.status_line(ui);
    }

    fn status_line(&self, ui: &mut egui::Ui) {
        if self.controller.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        } else if let Some(err) = self.controller.last_error() {
            ui.colored_label(egui::Color32::LIGHT_RED, err);
        } else if let Some(chart) = self.controller.chart() {
            ui.label(format!(
                "{} candles, {} levels",
                chart.candle_count(),
                chart.level_count()
            ));
        }
    }

    fn chart_panel(controller: &mut ChartController<EguiSurface>, ui: &mut egui::Ui) {
        match controller.chart_mut() {
            Some(chart) => {
                chart.show(ui);
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("Press Update to load a chart");
                });
            }
        }
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply any completed request before drawing this frame.
        self.controller.poll();
        if self.controller.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }

        egui::SidePanel::right("selector_panel")
            .default_width(220.0)
            .show(ctx, |ui| {
                self.selector_panel(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                Self::chart_panel(&mut self.controller, ui);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.teardown();
    }
}
