use eframe::egui::{self, Color32, RichText};

use crate::data::loader::DataPaths;
use crate::state::{AppState, Tab};
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TitanicExplorerApp {
    pub state: AppState,
}

impl TitanicExplorerApp {
    /// Load the dataset and train the model once, for the whole window.
    pub fn new(paths: &DataPaths) -> Self {
        Self {
            state: AppState::open(paths),
        }
    }
}

impl eframe::App for TitanicExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Startup failure: nothing else to show ----
        if let Some(err) = &self.state.startup_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Titanic dataset explorer");
                ui.label(RichText::new(err).color(Color32::RED));
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.state.tab, Tab::Explore, "Explore");
                ui.selectable_value(&mut self.state.tab, Tab::Prediction, "Prediction");
            });
            ui.separator();

            match self.state.tab {
                Tab::Explore => tabs::explore_tab(ui, &mut self.state),
                Tab::Prediction => tabs::prediction_tab(ui, &mut self.state),
            }
        });
    }
}
