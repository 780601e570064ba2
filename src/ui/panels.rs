use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{AloneFilter, SurvivalFilter};
use crate::state::{AppState, ExportKind};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let options = match &state.session {
        Some(session) => session.filter_options().clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let filters = &mut state.filters;

            if options.has_survived {
                ui.strong("Survival");
                egui::ComboBox::from_id_salt("survival")
                    .selected_text(filters.survived.to_string())
                    .show_ui(ui, |ui: &mut Ui| {
                        for choice in SurvivalFilter::CHOICES {
                            ui.selectable_value(&mut filters.survived, choice, choice.to_string());
                        }
                    });
                ui.add_space(6.0);
            }

            if !options.sexes.is_empty() {
                ui.strong("Sex");
                egui::ComboBox::from_id_salt("sex")
                    .selected_text(filters.sex.as_deref().unwrap_or("All"))
                    .show_ui(ui, |ui: &mut Ui| {
                        ui.selectable_value(&mut filters.sex, None, "All");
                        for sex in &options.sexes {
                            ui.selectable_value(&mut filters.sex, Some(sex.clone()), sex.as_str());
                        }
                    });
                ui.add_space(6.0);
            }

            if let Some((lo, hi)) = options.age_bounds {
                ui.strong("Age");
                let (mut min, mut max) = filters.age_range.unwrap_or((lo, hi));
                ui.add(egui::Slider::new(&mut min, lo..=hi).text("from"));
                ui.add(egui::Slider::new(&mut max, lo..=hi).text("to"));
                if min > max {
                    max = min;
                }
                filters.age_range = Some((min, max));
                ui.add_space(6.0);
            }

            if !options.classes.is_empty() {
                ui.strong("Class (Pclass)");
                ui.horizontal(|ui: &mut Ui| {
                    for class in &options.classes {
                        let mut checked = filters.classes.contains(class);
                        if ui.checkbox(&mut checked, class.to_string()).changed() {
                            if checked {
                                filters.classes.insert(*class);
                            } else {
                                filters.classes.remove(class);
                            }
                        }
                    }
                });
                if filters.classes.is_empty() {
                    ui.small("No class ticked: all classes shown.");
                }
                ui.add_space(6.0);
            }

            if !options.ports.is_empty() {
                ui.strong("Embarked");
                egui::ComboBox::from_id_salt("embarked")
                    .selected_text(filters.embarked.as_deref().unwrap_or("All"))
                    .show_ui(ui, |ui: &mut Ui| {
                        ui.selectable_value(&mut filters.embarked, None, "All");
                        for port in &options.ports {
                            ui.selectable_value(&mut filters.embarked, Some(port.clone()), port.as_str());
                        }
                    });
                ui.add_space(6.0);
            }

            if options.has_alone {
                ui.strong("Travelling alone");
                egui::ComboBox::from_id_salt("alone")
                    .selected_text(filters.alone.to_string())
                    .show_ui(ui, |ui: &mut Ui| {
                        for choice in AloneFilter::CHOICES {
                            ui.selectable_value(&mut filters.alone, choice, choice.to_string());
                        }
                    });
                ui.add_space(6.0);
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });

    // Recompute the view after any widget changes.
    state.refilter();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let enabled = state.view.is_some();
            if ui
                .add_enabled(enabled, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state, ExportKind::FilteredCsv);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(session), Some(view)) = (&state.session, &state.view) {
            ui.label(format!(
                "{} passengers loaded, {} visible",
                session.prepared().len(),
                view.table.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let colour = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(colour));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a destination and save `kind` there.
pub fn save_file_dialog(state: &mut AppState, kind: ExportKind) {
    let ext = kind.extension();
    let file = rfd::FileDialog::new()
        .set_title(kind.button_label())
        .set_file_name(kind.file_name())
        .add_filter(ext.to_ascii_uppercase(), &[ext])
        .save_file();

    if let Some(path) = file {
        state.save_export(kind, &path);
    }
}
