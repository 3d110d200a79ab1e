mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::WorkationApp;
use clap::Parser;
use config::CliArgs;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let args = CliArgs::parse();

    // Loaded once here; the state owns the dataset for the whole session.
    let state = AppState::new(args.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Workation Explorer – Best Workation Cities",
        options,
        Box::new(|_cc| Ok(Box::new(WorkationApp::new(state)))),
    )
}
