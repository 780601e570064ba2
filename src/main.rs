mod app;
mod charts;
mod color;
mod data;
mod export;
mod predict;
mod session;
mod state;
mod summary;
mod ui;

use app::TitanicExplorerApp;
use data::loader::DataPaths;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let paths = DataPaths::from_env();
    log::info!("Reading data from {}", paths.data_csv().display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Titanic Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(TitanicExplorerApp::new(&paths)))),
    )
}
