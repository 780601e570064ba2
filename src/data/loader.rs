use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Passenger, PassengerTable, Value};

/// File name of the dataset under `<root>/data/`.
pub const DATASET_FILE: &str = "Titanic-Dataset.csv";

/// Environment variable overriding the project root.
pub const ROOT_ENV_VAR: &str = "TITANIC_EXPLORER_ROOT";

// ---------------------------------------------------------------------------
// Data location
// ---------------------------------------------------------------------------

/// Where the explorer looks for its data: `<root>/data/Titanic-Dataset.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataPaths { root: root.into() }
    }

    /// Root from `TITANIC_EXPLORER_ROOT`, falling back to the working directory.
    pub fn from_env() -> Self {
        let root = std::env::var_os(ROOT_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        DataPaths { root }
    }

    pub fn data_csv(&self) -> PathBuf {
        self.root.join("data").join(DATASET_FILE)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV not found: {}\nPlace Titanic-Dataset.csv in <project_root>/data/.", .path.display())]
    NotFound { path: PathBuf },

    #[error("reading CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load the raw passenger table.
///
/// Every column of the file is kept; cell types are inferred per cell and
/// mixed integer/float columns are promoted to float afterwards.
pub fn load_csv(path: &Path) -> Result<PassengerTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut passengers = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let mut fields = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(col_name) = headers.get(col_idx) else {
                continue;
            };
            fields.insert(col_name.clone(), guess_value_type(value));
        }
        passengers.push(Passenger { fields });
    }

    let mut table = PassengerTable::new(headers, passengers);
    promote_mixed_numeric_columns(&mut table);

    log::info!(
        "Loaded {} passengers with columns {:?} from {}",
        table.len(),
        table.column_names,
        path.display()
    );
    Ok(table)
}

fn guess_value_type(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    match s {
        "true" | "True" => Value::Bool(true),
        "false" | "False" => Value::Bool(false),
        _ => Value::String(s.to_string()),
    }
}

/// A column holding both integers and floats (e.g. `Age`: `22`, `0.42`)
/// becomes all-float, like a dataframe column dtype would.
fn promote_mixed_numeric_columns(table: &mut PassengerTable) {
    for col in &table.column_names {
        let has_float = table
            .passengers
            .iter()
            .any(|p| matches!(p.get(col), Value::Float(_)));
        if !has_float {
            continue;
        }
        for p in &mut table.passengers {
            if let Some(cell) = p.fields.get_mut(col) {
                if let Value::Integer(i) = *cell {
                    *cell = Value::Float(i as f64);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::columns;
    use tempfile::tempdir;

    #[test]
    fn reads_csv_rows_and_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATASET_FILE);
        std::fs::write(
            &path,
            "Survived,Pclass,Sex,Age,SibSp,Parch,Fare,Embarked\n1,1,female,29,0,0,71.2833,C\n",
        )
        .unwrap();

        let table = load_csv(&path).unwrap();

        assert_eq!(table.len(), 1);
        for col in [columns::SURVIVED, columns::PCLASS, columns::SEX] {
            assert!(table.has_column(col));
        }
        assert_eq!(table.passengers[0].get(columns::SEX), &Value::String("female".into()));
    }

    #[test]
    fn empty_cells_are_missing_and_mixed_columns_become_float() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATASET_FILE);
        std::fs::write(&path, "Age,Cabin\n22,\n,C85\n0.42,\n").unwrap();

        let table = load_csv(&path).unwrap();
        let ages: Vec<_> = table.column(columns::AGE).cloned().collect();

        assert_eq!(ages, vec![Value::Float(22.0), Value::Null, Value::Float(0.42)]);
        assert_eq!(table.missing_total(), 3);
    }

    #[test]
    fn missing_file_names_the_expected_location() {
        let dir = tempdir().unwrap();
        let paths = DataPaths::new(dir.path());

        let err = load_csv(&paths.data_csv()).unwrap_err();

        assert!(matches!(err, LoadError::NotFound { .. }));
        let msg = err.to_string();
        assert!(msg.contains("<project_root>/data/"));
        assert!(msg.contains(DATASET_FILE));
    }

    #[test]
    fn data_csv_follows_the_root_data_convention() {
        let paths = DataPaths::new("/srv/titanic");
        assert_eq!(
            paths.data_csv(),
            PathBuf::from("/srv/titanic/data/Titanic-Dataset.csv")
        );
    }
}
