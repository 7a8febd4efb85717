//! Trade Chart - main application entry point.

use eframe::egui;
use tracing::info;

use trade_chart::market::logger;
use trade_chart::ui::ChartApp;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_logger();

    // Network requests run on this runtime while the main thread stays
    // blocked in eframe below.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    info!("starting trade_chart v{}", trade_chart::VERSION);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Trade Chart"),
        ..Default::default()
    };

    eframe::run_native(
        "Trade Chart",
        options,
        Box::new(|cc| Ok(Box::new(ChartApp::new(cc)?))),
    )?;

    Ok(())
}
