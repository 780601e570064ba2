use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::session::percent;
use crate::state::{AppState, ExportKind};
use crate::ui::panels::save_file_dialog;
use crate::ui::{plot, tables};

/// Form choices for the passenger class.
const CLASS_CHOICES: [i64; 3] = [1, 2, 3];

// ---------------------------------------------------------------------------
// Explore tab
// ---------------------------------------------------------------------------

pub fn explore_tab(ui: &mut Ui, state: &mut AppState) {
    let mut export = None;

    {
        let Some(view) = &state.view else {
            ui.label("No dataset loaded.");
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                ui.columns(2, |cols| {
                    let left = &mut cols[0];
                    left.heading("Overview");
                    tables::overview_grid(left, &view.overview);
                    left.add_space(8.0);

                    left.heading("Filtered data");
                    tables::passenger_table(left, &view.table);
                    if left.button(ExportKind::FilteredCsv.button_label()).clicked() {
                        export = Some(ExportKind::FilteredCsv);
                    }

                    let right = &mut cols[1];
                    right.heading("Numeric statistics");
                    tables::describe_table(right, &view.describe);
                    right.add_space(8.0);

                    right.heading("Plots");
                    let charts = [
                        ("age_chart", &view.by_age, ExportKind::AgeChart),
                        ("sex_chart", &view.by_sex, ExportKind::SexChart),
                        ("class_chart", &view.by_class, ExportKind::ClassChart),
                    ];
                    for (id, chart, kind) in charts {
                        plot::survival_chart(right, id, chart);
                        if right
                            .add_enabled(chart.is_ok(), egui::Button::new(kind.button_label()))
                            .clicked()
                        {
                            export = Some(kind);
                        }
                        right.add_space(8.0);
                    }

                    right.strong("Survival rate by sex and class");
                    tables::sex_class_grid(right, &view.by_sex_and_class);
                    right.add_space(4.0);
                    right.small(
                        "Pclass is the passenger socio-economic class: 1 = first class, \
                         2 = second class, 3 = third class.",
                    );
                });
            });
    }

    if let Some(kind) = export {
        save_file_dialog(state, kind);
    }
}

// ---------------------------------------------------------------------------
// Prediction tab
// ---------------------------------------------------------------------------

pub fn prediction_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Survival prediction");

    let sexes = match &state.session {
        Some(session) if !session.sex_categories().is_empty() => {
            session.sex_categories().to_vec()
        }
        _ => vec!["male".to_string(), "female".to_string()],
    };

    let form = &mut state.form;
    egui::Grid::new("predict_form")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Sex");
            egui::ComboBox::from_id_salt("predict_sex")
                .selected_text(form.sex.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for sex in &sexes {
                        ui.selectable_value(&mut form.sex, sex.clone(), sex.as_str());
                    }
                });
            ui.end_row();

            ui.label("Class (Pclass)");
            egui::ComboBox::from_id_salt("predict_class")
                .selected_text(form.pclass.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for class in CLASS_CHOICES {
                        ui.selectable_value(&mut form.pclass, class, class.to_string());
                    }
                });
            ui.end_row();

            ui.label("Age");
            ui.add(egui::DragValue::new(&mut form.age).range(0.0..=100.0).speed(1.0));
            ui.end_row();

            ui.label("Fare");
            ui.add(egui::DragValue::new(&mut form.fare).range(0.0..=600.0).speed(1.0));
            ui.end_row();

            ui.label("SibSp");
            ui.add(egui::DragValue::new(&mut form.sibsp).range(0..=10));
            ui.end_row();

            ui.label("Parch");
            ui.add(egui::DragValue::new(&mut form.parch).range(0..=10));
            ui.end_row();
        });

    ui.add_space(8.0);
    if ui.button("Predict").clicked() {
        state.run_prediction();
    }
    ui.add_space(8.0);

    match &state.prediction {
        None => {
            ui.label("Fill the form and click Predict to run the model.");
        }
        Some(prediction) => {
            ui.label("Survival probability");
            ui.label(RichText::new(percent(prediction.probability)).heading().strong());
            ui.label(format!(
                "Predicted class: {} (1 = survived, 0 = not survived)",
                prediction.class
            ));
        }
    }

    ui.add_space(8.0);
    ui.small(
        "This model is trained on the Titanic dataset. \
         It provides an indicative estimate, not a factual outcome.",
    );
}
