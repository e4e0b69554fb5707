mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::PathBuf;

use app::AnalyticsApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load().unwrap_or_else(|e| {
        log::warn!("Using default configuration: {e:#}");
        DashboardConfig::default()
    });
    // Optional file to open on start-up.
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "LinkedIn Analytics Dashboard",
        options,
        Box::new(move |_cc| {
            let mut app = AnalyticsApp::new(config);
            if let Some(path) = initial_file {
                app.state.load_path(&path);
            }
            Ok(Box::new(app))
        }),
    )
}
