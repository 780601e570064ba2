use std::io::Cursor;
use std::sync::OnceLock;

use anyhow::{anyhow, bail, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;

use crate::charts::BarChart;
use crate::color::generate_palette;
use crate::data::model::PassengerTable;

/// Pixel size of exported chart images.
const PNG_SIZE: (u32, u32) = (800, 480);

/// Family every chart text is drawn with.
const FONT_FAMILY: &str = "sans-serif";

static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// The table as UTF-8 CSV: header row, no index column, missing cells empty.
pub fn table_to_csv_bytes(table: &PassengerTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.column_names)
        .context("writing CSV header")?;
    for (row_no, p) in table.passengers.iter().enumerate() {
        writer
            .write_record(table.column_names.iter().map(|c| p.get(c).to_csv_field()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV: {}", e.error()))
}

// ---------------------------------------------------------------------------
// PNG
// ---------------------------------------------------------------------------

/// Rasterise a bar chart and encode it as PNG.
pub fn chart_to_png_bytes(chart: &BarChart) -> Result<Vec<u8>> {
    if chart.bars.is_empty() {
        bail!("chart '{}' has no bars to draw", chart.title);
    }
    ensure_font()?;

    let (width, height) = PNG_SIZE;
    let mut pixels = vec![255u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw_bars(&root, chart).map_err(|e| anyhow!("drawing '{}': {e}", chart.title))?;
        root.present()
            .map_err(|e| anyhow!("rendering '{}': {e}", chart.title))?;
    }

    let image = image::RgbImage::from_raw(width, height, pixels)
        .context("bitmap buffer does not match the image size")?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .context("encoding PNG")?;
    Ok(out.into_inner())
}

/// Register egui's proportional font with plotters, once per process.
fn ensure_font() -> Result<()> {
    let registered = *FONT_REGISTERED.get_or_init(|| {
        let ok = register_font(
            FONT_FAMILY,
            FontStyle::Normal,
            epaint_default_fonts::UBUNTU_LIGHT,
        )
        .is_ok();
        if !ok {
            log::error!("Bundled chart font could not be parsed");
        }
        ok
    });
    if !registered {
        bail!("no font available to draw chart text");
    }
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &BarChart,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let n = chart.bars.len();
    let mut ctx = ChartBuilder::on(root)
        .caption(chart.title, (FONT_FAMILY, 24))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..n as f64, 0f64..1.1f64)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc(chart.x_label)
        .y_desc("Survival rate")
        .y_label_formatter(&|v: &f64| format!("{:.0}%", v * 100.0))
        .draw()?;

    let colours = generate_palette(n);
    ctx.draw_series(chart.bars.iter().zip(&colours).enumerate().map(|(i, (bar, c))| {
        let x = i as f64;
        Rectangle::new(
            [(x + 0.15, 0.0), (x + 0.85, bar.rate)],
            RGBColor(c[0], c[1], c[2]).filled(),
        )
    }))?;

    // label, rate and count above each bar
    ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
        Text::new(
            format!("{}: {:.0}% (n={})", bar.label, bar.rate * 100.0, bar.count),
            (i as f64 + 0.15, bar.rate + 0.06),
            (FONT_FAMILY, 14),
        )
    }))?;

    Ok(())
}
