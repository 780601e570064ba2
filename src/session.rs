use anyhow::{Context, Result};

use crate::charts::{self, ChartResult, NoData, SurvivalGrid};
use crate::data::filter::{self, FilterOptions, FilterSpec};
use crate::data::loader::{load_csv, DataPaths};
use crate::data::model::PassengerTable;
use crate::data::prepare::prepare;
use crate::predict::{FeatureRecord, Prediction, Predictor};
use crate::summary::{self, Describe, Overview};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One exploration session: the prepared table and the model trained on
/// it, both computed once and kept until the session is dropped.
pub struct Session {
    prepared: PassengerTable,
    options: FilterOptions,
    predictor: Predictor,
}

/// Everything the Explore tab shows for one filter selection.
pub struct ExploreView {
    pub table: PassengerTable,
    pub overview: Overview,
    pub describe: Describe,
    pub by_age: ChartResult,
    pub by_sex: ChartResult,
    pub by_class: ChartResult,
    pub by_sex_and_class: Result<SurvivalGrid, NoData>,
}

impl Session {
    /// Load `<root>/data/Titanic-Dataset.csv`, prepare it and train the model.
    pub fn open(paths: &DataPaths) -> Result<Self> {
        let raw = load_csv(&paths.data_csv()).context("Failed to load data.")?;
        Self::from_raw(&raw)
    }

    pub fn from_raw(raw: &PassengerTable) -> Result<Self> {
        let prepared = prepare(raw);
        log::info!(
            "Prepared table: {} rows, columns {:?}",
            prepared.len(),
            prepared.column_names
        );
        let predictor =
            Predictor::train(&prepared).context("Failed to train the prediction model.")?;

        Ok(Session {
            options: FilterOptions::from_table(&prepared),
            prepared,
            predictor,
        })
    }

    pub fn prepared(&self) -> &PassengerTable {
        &self.prepared
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    /// The filter state a fresh session starts with.
    pub fn default_filters(&self) -> FilterSpec {
        self.options.default_spec()
    }

    pub fn filtered(&self, spec: &FilterSpec) -> PassengerTable {
        filter::apply(&self.prepared, spec)
    }

    /// Filter, then compute every summary and chart aggregate.
    pub fn explore(&self, spec: &FilterSpec) -> ExploreView {
        let table = self.filtered(spec);
        log::debug!("Filter {spec:?} keeps {} of {} rows", table.len(), self.prepared.len());

        ExploreView {
            overview: summary::overview(&table),
            describe: summary::numeric_describe(&table),
            by_age: charts::survival_by_age_bucket(&table),
            by_sex: charts::survival_by_sex(&table),
            by_class: charts::survival_by_class(&table),
            by_sex_and_class: charts::survival_by_sex_and_class(&table),
            table,
        }
    }

    /// Sex values the model was trained on.
    pub fn sex_categories(&self) -> &[String] {
        self.predictor.categories()
    }

    pub fn predict(&self, record: &FeatureRecord) -> Prediction {
        self.predictor.predict(record)
    }
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// `0.3838` → `"38.4%"`
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

impl Overview {
    /// `(label, value)` lines for display.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("Rows", self.rows.to_string()),
            ("Columns", self.cols.to_string()),
            ("Missing values", self.missing_total.to_string()),
        ];
        if let Some(rate) = self.survival_rate {
            lines.push(("Survival rate", percent(rate)));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::SurvivalFilter;
    use crate::data::fixtures::sample_table;
    use crate::data::loader::{LoadError, DATASET_FILE};
    use crate::export::table_to_csv_bytes;
    use tempfile::tempdir;

    #[test]
    fn opens_from_project_root() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        let csv = table_to_csv_bytes(&sample_table()).unwrap();
        std::fs::write(dir.path().join("data").join(DATASET_FILE), csv).unwrap();

        let session = Session::open(&DataPaths::new(dir.path())).unwrap();

        assert_eq!(session.prepared().len(), 4);
        assert!(!session.prepared().has_column("Cabin"));
    }

    #[test]
    fn missing_file_surfaces_not_found() {
        let dir = tempdir().unwrap();

        let err = Session::open(&DataPaths::new(dir.path())).err().unwrap();

        assert_eq!(err.to_string(), "Failed to load data.");
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::NotFound { .. })
        ));
    }

    #[test]
    fn explore_reflects_filters() {
        let session = Session::from_raw(&sample_table()).unwrap();

        let all = session.explore(&session.default_filters());
        assert_eq!(all.overview.rows, 4);
        assert!(all.by_age.is_ok());

        let spec = FilterSpec {
            survived: SurvivalFilter::Survived,
            sex: Some("male".into()),
            ..Default::default()
        };
        let none = session.explore(&spec);
        assert_eq!(none.overview.rows, 0);
        assert_eq!(none.overview.survival_rate, None);
        assert_eq!(none.by_sex, Err(NoData::EmptyTable));
    }

    #[test]
    fn predicts_from_user_values() {
        let session = Session::from_raw(&sample_table()).unwrap();

        let pred = session.predict(&FeatureRecord {
            pclass: 3,
            sex: "male".into(),
            age: 22.0,
            fare: 7.25,
            sibsp: 1,
            parch: 0,
        });

        assert!((0.0..=1.0).contains(&pred.probability));
        assert_eq!(pred.class == 1, pred.probability >= 0.5);
    }

    #[test]
    fn overview_lines_format_rate() {
        let ov = summary::overview(&sample_table());
        let lines = ov.lines();
        assert_eq!(lines.last(), Some(&("Survival rate", "50.0%".to_string())));
        assert_eq!(percent(0.3838), "38.4%");
    }
}
