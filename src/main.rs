mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod selection;
mod state;
mod ui;

use app::DataVisionApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    log::info!("Data directory: {}", config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "DataVision Pro",
        options,
        Box::new(|_cc| Ok(Box::new(DataVisionApp::new(config)))),
    )
}
