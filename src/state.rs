use std::path::Path;

use anyhow::{Context, Result};

use crate::charts::ChartResult;
use crate::data::filter::FilterSpec;
use crate::data::loader::DataPaths;
use crate::export::{chart_to_png_bytes, table_to_csv_bytes};
use crate::predict::{FeatureRecord, Prediction};
use crate::session::{ExploreView, Session};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Explore,
    Prediction,
}

/// Values typed into the prediction form.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionForm {
    pub sex: String,
    pub pclass: i64,
    pub age: f64,
    pub fare: f64,
    pub sibsp: i64,
    pub parch: i64,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self {
            sex: "male".to_string(),
            pclass: 1,
            age: 30.0,
            fare: 30.0,
            sibsp: 0,
            parch: 0,
        }
    }
}

impl PredictionForm {
    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord {
            pclass: self.pclass,
            sex: self.sex.clone(),
            age: self.age,
            fare: self.fare,
            sibsp: self.sibsp,
            parch: self.parch,
        }
    }
}

/// Something the user can save to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    FilteredCsv,
    AgeChart,
    SexChart,
    ClassChart,
}

impl ExportKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::FilteredCsv => "titanic_filtered.csv",
            Self::AgeChart => "plot_age.png",
            Self::SexChart => "plot_sex.png",
            Self::ClassChart => "plot_class.png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::FilteredCsv => "csv",
            _ => "png",
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            Self::FilteredCsv => "Download filtered CSV",
            Self::AgeChart => "Download plot (Age) as PNG",
            Self::SexChart => "Download plot (Sex) as PNG",
            Self::ClassChart => "Download plot (Class) as PNG",
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded session (None when startup failed).
    pub session: Option<Session>,

    /// Why the session could not start; shown instead of the explorer.
    pub startup_error: Option<String>,

    /// Current filter selection, edited by the side panel.
    pub filters: FilterSpec,

    /// Filtered table and aggregates for `view_filters` (cached).
    pub view: Option<ExploreView>,
    view_filters: Option<FilterSpec>,

    pub tab: Tab,
    pub form: PredictionForm,
    pub prediction: Option<Prediction>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start a session from `<root>/data/`.  Failures are kept for display.
    pub fn open(paths: &DataPaths) -> Self {
        match Session::open(paths) {
            Ok(session) => Self::with_session(session),
            Err(e) => {
                log::error!("Session startup failed: {e:#}");
                Self {
                    startup_error: Some(format!("{e:#}")),
                    ..Self::default()
                }
            }
        }
    }

    pub fn with_session(session: Session) -> Self {
        let mut state = Self {
            filters: session.default_filters(),
            session: Some(session),
            ..Self::default()
        };
        state.refilter();
        state
    }

    /// Recompute the explore view if the filters changed since last time.
    pub fn refilter(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if self.view.is_some() && self.view_filters.as_ref() == Some(&self.filters) {
            return;
        }
        self.view = Some(session.explore(&self.filters));
        self.view_filters = Some(self.filters.clone());
    }

    pub fn reset_filters(&mut self) {
        if let Some(session) = &self.session {
            self.filters = session.default_filters();
            self.refilter();
        }
    }

    pub fn run_prediction(&mut self) {
        if let Some(session) = &self.session {
            let record = self.form.to_record();
            let prediction = session.predict(&record);
            log::info!("Prediction for {record:?}: {prediction:?}");
            self.prediction = Some(prediction);
        }
    }

    /// Write an export of the current view to `path` and report the outcome
    /// in the status line.
    pub fn save_export(&mut self, kind: ExportKind, path: &Path) {
        match self.write_export(kind, path) {
            Ok(()) => {
                log::info!("Saved {kind:?} to {}", path.display());
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn write_export(&self, kind: ExportKind, path: &Path) -> Result<()> {
        let view = self.view.as_ref().context("no data loaded")?;
        let bytes = match kind {
            ExportKind::FilteredCsv => table_to_csv_bytes(&view.table)?,
            ExportKind::AgeChart => chart_png(&view.by_age)?,
            ExportKind::SexChart => chart_png(&view.by_sex)?,
            ExportKind::ClassChart => chart_png(&view.by_class)?,
        };
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
    }
}

fn chart_png(chart: &ChartResult) -> Result<Vec<u8>> {
    let chart = chart.as_ref().map_err(|no_data| anyhow::anyhow!("{no_data}"))?;
    chart_to_png_bytes(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::SurvivalFilter;
    use crate::data::fixtures::sample_table;
    use tempfile::tempdir;

    fn state() -> AppState {
        AppState::with_session(Session::from_raw(&sample_table()).unwrap())
    }

    #[test]
    fn starts_with_every_row_visible() {
        let state = state();
        assert_eq!(state.view.as_ref().map(|v| v.table.len()), Some(4));
        assert!(state.startup_error.is_none());
    }

    #[test]
    fn refilter_follows_filter_changes() {
        let mut state = state();

        state.filters.survived = SurvivalFilter::NotSurvived;
        state.refilter();
        assert_eq!(state.view.as_ref().map(|v| v.overview.rows), Some(2));

        state.reset_filters();
        assert_eq!(state.view.as_ref().map(|v| v.overview.rows), Some(4));
    }

    #[test]
    fn startup_failure_is_kept_not_fatal() {
        let dir = tempdir().unwrap();

        let state = AppState::open(&DataPaths::new(dir.path()));

        assert!(state.session.is_none());
        let msg = state.startup_error.unwrap();
        assert!(msg.contains("Failed to load data."));
        assert!(msg.contains("<project_root>/data/"));
    }

    #[test]
    fn prediction_is_stored() {
        let mut state = state();
        state.form = PredictionForm {
            pclass: 3,
            ..PredictionForm::default()
        };

        state.run_prediction();

        let pred = state.prediction.unwrap();
        assert!((0.0..=1.0).contains(&pred.probability));
    }

    #[test]
    fn exports_write_files() {
        let dir = tempdir().unwrap();
        let mut state = state();

        let csv = dir.path().join(ExportKind::FilteredCsv.file_name());
        state.save_export(ExportKind::FilteredCsv, &csv);
        let png = dir.path().join(ExportKind::ClassChart.file_name());
        state.save_export(ExportKind::ClassChart, &png);

        assert!(std::fs::read_to_string(&csv).unwrap().starts_with("Survived,"));
        assert!(std::fs::read(&png).unwrap().starts_with(b"\x89PNG"));
        assert!(state.status_message.unwrap().starts_with("Saved"));
    }

    #[test]
    fn exporting_an_empty_chart_reports_an_error() {
        let dir = tempdir().unwrap();
        let mut state = state();
        state.filters.sex = Some("nobody".into());
        state.refilter();

        let png = dir.path().join(ExportKind::AgeChart.file_name());
        state.save_export(ExportKind::AgeChart, &png);

        assert!(!png.exists());
        assert!(state.status_message.unwrap().starts_with("Error"));
    }
}
