use std::collections::{BTreeMap, BTreeSet};

use linfa::traits::Fit;
use linfa::DatasetBase;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

use crate::data::model::{columns, PassengerTable, Value};
use crate::summary::median;

/// Model inputs, in the order they are asked for in the prediction form.
pub const FEATURES: [&str; 6] = [
    columns::PCLASS,
    columns::SEX,
    columns::AGE,
    columns::FARE,
    columns::SIBSP,
    columns::PARCH,
];
pub const TARGET: &str = columns::SURVIVED;

/// Numeric features passed to the model unchanged, after the sex encoding.
const NUMERIC_FEATURES: [&str; 5] = [
    columns::PCLASS,
    columns::AGE,
    columns::FARE,
    columns::SIBSP,
    columns::PARCH,
];

const MAX_ITERATIONS: u64 = 2000;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("missing features: {}", .0.join(", "))]
    MissingFeature(Vec<String>),

    #[error("column {0} has no usable values")]
    NoValues(&'static str),

    #[error("fitting the survival model failed: {0}")]
    Fit(String),
}

// ---------------------------------------------------------------------------
// Prediction input / output
// ---------------------------------------------------------------------------

/// The six values a survival estimate is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub pclass: i64,
    pub sex: String,
    pub age: f64,
    pub fare: f64,
    pub sibsp: i64,
    pub parch: i64,
}

impl FeatureRecord {
    /// Build a record from named values, e.g. a table row.  Every feature
    /// that is absent, missing or of the wrong type is reported at once.
    pub fn from_values(values: &BTreeMap<String, Value>) -> Result<Self, PredictError> {
        let get = |name: &str| values.get(name).filter(|v| !v.is_null());
        let int = |name: &str| get(name).and_then(Value::as_i64);
        let float = |name: &str| get(name).and_then(Value::as_f64);

        let pclass = int(columns::PCLASS);
        let sex = get(columns::SEX).and_then(Value::as_str).map(str::to_string);
        let age = float(columns::AGE);
        let fare = float(columns::FARE);
        let sibsp = int(columns::SIBSP);
        let parch = int(columns::PARCH);

        match (pclass, sex, age, fare, sibsp, parch) {
            (Some(pclass), Some(sex), Some(age), Some(fare), Some(sibsp), Some(parch)) => {
                Ok(FeatureRecord {
                    pclass,
                    sex,
                    age,
                    fare,
                    sibsp,
                    parch,
                })
            }
            (pclass, sex, age, fare, sibsp, parch) => {
                let present = [
                    pclass.is_some(),
                    sex.is_some(),
                    age.is_some(),
                    fare.is_some(),
                    sibsp.is_some(),
                    parch.is_some(),
                ];
                let missing = FEATURES
                    .iter()
                    .zip(present)
                    .filter(|(_, ok)| !ok)
                    .map(|(name, _)| name.to_string())
                    .collect();
                Err(PredictError::MissingFeature(missing))
            }
        }
    }

    fn numeric(&self) -> [f64; 5] {
        [
            self.pclass as f64,
            self.age,
            self.fare,
            self.sibsp as f64,
            self.parch as f64,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// 1 = survived, 0 = not survived.
    pub class: u8,
    /// Probability of survival, in `[0, 1]`.
    pub probability: f64,
}

impl Prediction {
    fn from_probability(p: f64) -> Self {
        let probability = p.clamp(0.0, 1.0);
        Prediction {
            class: u8::from(probability >= 0.5),
            probability,
        }
    }
}

// ---------------------------------------------------------------------------
// Trained classifier
// ---------------------------------------------------------------------------

/// Logistic regression over a one-hot encoded sex plus the five numeric
/// features.  Immutable once trained.
pub struct Predictor {
    /// Sex categories seen at training time, in encoding order.
    categories: Vec<String>,
    model: FittedLogisticRegression<f64, usize>,
}

impl Predictor {
    /// Fit the model on every usable row of `table`.
    ///
    /// Missing `Age` and `Fare` are filled with their medians first.  Rows
    /// missing the target or any other feature are left out.
    pub fn train(table: &PassengerTable) -> Result<Self, PredictError> {
        let missing: Vec<String> = FEATURES
            .iter()
            .chain(std::iter::once(&TARGET))
            .filter(|c| !table.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PredictError::MissingFeature(missing));
        }

        let age_fill = median(&table.numeric_values(columns::AGE))
            .ok_or(PredictError::NoValues(columns::AGE))?;
        let fare_fill = median(&table.numeric_values(columns::FARE))
            .ok_or(PredictError::NoValues(columns::FARE))?;

        let categories: Vec<String> = table
            .column(columns::SEX)
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut rows = Vec::new();
        let mut targets = Vec::new();
        for p in &table.passengers {
            let Some(target) = p.get(TARGET).as_i64() else {
                continue;
            };
            let mut values = p.fields.clone();
            fill_missing(&mut values, columns::AGE, age_fill);
            fill_missing(&mut values, columns::FARE, fare_fill);
            let Ok(record) = FeatureRecord::from_values(&values) else {
                continue;
            };
            rows.push(encode(&categories, &record));
            targets.push(usize::from(target == 1));
        }

        if rows.is_empty() {
            return Err(PredictError::NoValues(TARGET));
        }
        let skipped = table.len() - rows.len();
        if skipped > 0 {
            log::debug!("Skipped {skipped} rows with missing model inputs");
        }

        let n_cols = categories.len() + NUMERIC_FEATURES.len();
        let n_rows = rows.len();
        let records = Array2::from_shape_vec((n_rows, n_cols), rows.concat())
            .map_err(|e| PredictError::Fit(e.to_string()))?;
        let dataset = DatasetBase::new(records, Array1::from(targets));

        let model = LogisticRegression::default()
            .max_iterations(MAX_ITERATIONS)
            .fit(&dataset)
            .map_err(|e: linfa_logistic::error::Error| PredictError::Fit(e.to_string()))?;

        log::info!(
            "Trained survival model on {n_rows} passengers, sex categories {categories:?}"
        );
        Ok(Predictor { categories, model })
    }

    /// Survival estimate for one passenger.  Unknown sex categories encode
    /// as all zeros.
    pub fn predict(&self, record: &FeatureRecord) -> Prediction {
        let x = Array1::from(encode(&self.categories, record)).insert_axis(Axis(0));
        let p_positive = self.model.predict_probabilities(&x)[0];
        // the fitted model reports the probability of its own positive label
        let p_survived = if self.model.labels().pos.class == 1 {
            p_positive
        } else {
            1.0 - p_positive
        };
        Prediction::from_probability(p_survived)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

fn fill_missing(values: &mut BTreeMap<String, Value>, column: &str, fill: f64) {
    if values.get(column).map_or(true, Value::is_null) {
        values.insert(column.to_string(), Value::Float(fill));
    }
}

/// `[one-hot sex..., Pclass, Age, Fare, SibSp, Parch]`
fn encode(categories: &[String], record: &FeatureRecord) -> Vec<f64> {
    categories
        .iter()
        .map(|c| if *c == record.sex { 1.0 } else { 0.0 })
        .chain(record.numeric())
        .collect()
}
