use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::model::{columns, Passenger, PassengerTable, Value};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurvivalFilter {
    #[default]
    All,
    Survived,
    NotSurvived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AloneFilter {
    #[default]
    All,
    Yes,
    No,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown filter choice '{0}'")]
pub struct UnknownChoice(pub String);

impl SurvivalFilter {
    pub const CHOICES: [SurvivalFilter; 3] = [Self::All, Self::Survived, Self::NotSurvived];

    fn wanted(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Survived => Some(1),
            Self::NotSurvived => Some(0),
        }
    }
}

impl fmt::Display for SurvivalFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Survived => "Survived",
            Self::NotSurvived => "Not Survived",
        })
    }
}

impl FromStr for SurvivalFilter {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(Self::All),
            "Survived" => Ok(Self::Survived),
            "Not Survived" => Ok(Self::NotSurvived),
            other => Err(UnknownChoice(other.to_string())),
        }
    }
}

impl AloneFilter {
    pub const CHOICES: [AloneFilter; 3] = [Self::All, Self::Yes, Self::No];

    fn wanted(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }
}

impl fmt::Display for AloneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Yes => "Yes",
            Self::No => "No",
        })
    }
}

impl FromStr for AloneFilter {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(Self::All),
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            other => Err(UnknownChoice(other.to_string())),
        }
    }
}

/// The conjunction of optional predicates narrowing a table.
/// `None`, `All` or an empty class set means "no constraint".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    pub survived: SurvivalFilter,
    pub sex: Option<String>,
    /// Inclusive `[min, max]` on `Age`.
    pub age_range: Option<(f64, f64)>,
    pub classes: BTreeSet<i64>,
    pub embarked: Option<String>,
    pub alone: AloneFilter,
}

impl FilterSpec {
    /// Whether a passenger passes every active predicate that `table` can
    /// evaluate.  Predicates on absent columns are skipped.
    fn matches(&self, table: &PassengerTable, p: &Passenger) -> bool {
        if let Some(wanted) = self.survived.wanted() {
            if table.has_column(columns::SURVIVED)
                && p.get(columns::SURVIVED).as_i64() != Some(wanted)
            {
                return false;
            }
        }

        if let Some(sex) = &self.sex {
            if table.has_column(columns::SEX) && p.get(columns::SEX).as_str() != Some(sex.as_str()) {
                return false;
            }
        }

        if let Some((min, max)) = self.age_range {
            if table.has_column(columns::AGE) {
                match p.get(columns::AGE).as_f64() {
                    Some(age) if age >= min && age <= max => {}
                    _ => return false,
                }
            }
        }

        if !self.classes.is_empty() && table.has_column(columns::PCLASS) {
            match p.get(columns::PCLASS).as_i64() {
                Some(class) if self.classes.contains(&class) => {}
                _ => return false,
            }
        }

        if let Some(port) = &self.embarked {
            if table.has_column(columns::EMBARKED)
                && p.get(columns::EMBARKED).as_str() != Some(port.as_str())
            {
                return false;
            }
        }

        if let Some(wanted) = self.alone.wanted() {
            if table.has_column(columns::ALONE) && p.get(columns::ALONE).as_bool() != Some(wanted)
            {
                return false;
            }
        }

        true
    }
}

/// Return indices of passengers that pass all active filters, in row order.
pub fn filtered_indices(table: &PassengerTable, spec: &FilterSpec) -> Vec<usize> {
    table
        .passengers
        .iter()
        .enumerate()
        .filter(|(_, p)| spec.matches(table, p))
        .map(|(i, _)| i)
        .collect()
}

/// Apply `spec` to `table`, producing a new table.  The input is not modified.
pub fn apply(table: &PassengerTable, spec: &FilterSpec) -> PassengerTable {
    table.select(&filtered_indices(table, spec))
}

// ---------------------------------------------------------------------------
// Choices offered by the filter widgets
// ---------------------------------------------------------------------------

/// The values each filter widget can offer for a given table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptions {
    pub has_survived: bool,
    pub sexes: Vec<String>,
    /// `(min, max)` of the known ages.
    pub age_bounds: Option<(f64, f64)>,
    pub classes: Vec<i64>,
    pub ports: Vec<String>,
    pub has_alone: bool,
}

impl FilterOptions {
    pub fn from_table(table: &PassengerTable) -> Self {
        let ages = table.numeric_values(columns::AGE);
        let age_bounds = if ages.is_empty() {
            None
        } else {
            let min = ages.iter().copied().fold(f64::INFINITY, f64::min);
            let max = ages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some((min, max))
        };

        FilterOptions {
            has_survived: table.has_column(columns::SURVIVED),
            sexes: distinct_strings(table, columns::SEX),
            age_bounds,
            classes: table
                .column(columns::PCLASS)
                .filter_map(Value::as_i64)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            ports: distinct_strings(table, columns::EMBARKED),
            has_alone: table.has_column(columns::ALONE),
        }
    }

    /// Initial selection: every class ticked and the full age range.
    pub fn default_spec(&self) -> FilterSpec {
        FilterSpec {
            age_range: self.age_bounds,
            classes: self.classes.iter().copied().collect(),
            ..FilterSpec::default()
        }
    }
}

fn distinct_strings(table: &PassengerTable, column: &str) -> Vec<String> {
    table
        .distinct_values(column)
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}
