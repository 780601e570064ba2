use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::charts::{NoData, SurvivalGrid};
use crate::data::model::{PassengerTable, Value};
use crate::session::percent;
use crate::summary::{Describe, NumericSummary, Overview};

const ROW_HEIGHT: f32 = 18.0;

fn cell_text(value: &Value) -> String {
    if value.is_null() {
        String::new()
    } else {
        value.to_string()
    }
}

fn stat_text(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_else(|| "NaN".to_string())
}

/// Key figures as a two-column grid.
pub fn overview_grid(ui: &mut Ui, overview: &Overview) {
    egui::Grid::new("overview_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (label, value) in overview.lines() {
                ui.label(label);
                ui.strong(value);
                ui.end_row();
            }
        });
}

/// Scrollable grid of the filtered passengers.
pub fn passenger_table(ui: &mut Ui, table: &PassengerTable) {
    if table.column_names.is_empty() {
        ui.label("No columns.");
        return;
    }
    ui.push_id("passenger_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(360.0)
            .columns(Column::auto().at_least(48.0), table.n_cols())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for name in &table.column_names {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let passenger = &table.passengers[row.index()];
                    for name in &table.column_names {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell_text(passenger.get(name)));
                        });
                    }
                });
            });
    });
}

/// `describe()`-style statistics, one row per numeric column.
pub fn describe_table(ui: &mut Ui, describe: &Describe) {
    let rows = match describe {
        Describe::Columns(rows) => rows,
        Describe::Info(message) => {
            ui.label(RichText::new(message).italics());
            return;
        }
    };

    ui.push_id("describe_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(250.0)
            .columns(Column::auto().at_least(56.0), NumericSummary::HEADERS.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for name in NumericSummary::HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let summary = &rows[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(summary.column.as_str());
                    });
                    for stat in summary.cells() {
                        row.col(|ui: &mut Ui| {
                            ui.label(stat_text(stat));
                        });
                    }
                });
            });
    });
}

/// Survival rate for each sex × class cell.
pub fn sex_class_grid(ui: &mut Ui, grid: &Result<SurvivalGrid, NoData>) {
    let grid = match grid {
        Ok(grid) => grid,
        Err(no_data) => {
            ui.label(RichText::new(no_data.to_string()).italics());
            return;
        }
    };

    egui::Grid::new("sex_class_grid")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for class in &grid.classes {
                ui.strong(format!("Class {class}"));
            }
            ui.end_row();

            for (sex, rates) in grid.sexes.iter().zip(&grid.rates) {
                ui.strong(sex.as_str());
                for rate in rates {
                    ui.label(rate.map(percent).unwrap_or_else(|| "-".to_string()));
                }
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_render_blank() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&Value::Float(f64::NAN)), "");
        assert_eq!(cell_text(&Value::Float(7.25)), "7.25");
        assert_eq!(stat_text(None), "NaN");
        assert_eq!(stat_text(Some(0.5)), "0.500");
    }
}
