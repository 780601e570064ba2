use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::charts::ChartResult;
use crate::color::generate_palette;
use crate::session::percent;

// ---------------------------------------------------------------------------
// Survival-rate bar charts (Explore tab)
// ---------------------------------------------------------------------------

/// Render one survival-rate chart, or its "no data" message.
pub fn survival_chart(ui: &mut Ui, id: &str, chart: &ChartResult) {
    let chart = match chart {
        Ok(chart) => chart,
        Err(no_data) => {
            ui.label(RichText::new(no_data.to_string()).italics());
            return;
        }
    };

    ui.strong(chart.title);
    let colours = generate_palette(chart.bars.len());

    Plot::new(id)
        .legend(Legend::default())
        .height(220.0)
        .x_axis_label(chart.x_label)
        .y_axis_label("Survival rate")
        .include_y(0.0)
        .include_y(1.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // one series per bar so the legend names every group
            for (i, (bar, c)) in chart.bars.iter().zip(&colours).enumerate() {
                let colour = Color32::from_rgb(c[0], c[1], c[2]);
                let name = format!("{}: {} (n={})", bar.label, percent(bar.rate), bar.count);
                let series = BarChart::new(vec![Bar::new(i as f64, bar.rate)
                    .width(0.7)
                    .fill(colour)
                    .name(&name)])
                .color(colour)
                .name(name);
                plot_ui.bar_chart(series);
            }
        });
}
