use std::collections::BTreeMap;

use thiserror::Error;

use crate::data::model::{columns, Passenger, PassengerTable};

/// Edges of the age buckets.  Every bucket is `[lo, hi)` except the last,
/// which also includes 100.
pub const AGE_BUCKET_EDGES: [f64; 10] = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 100.0];

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// Why a chart has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoData {
    #[error("No data after filtering.")]
    EmptyTable,
    #[error("Missing columns: {}.", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("No {0} values after filtering.")]
    NoValues(String),
}

/// One bar: the survival rate of a group and the number of passengers in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    /// Mean of `Survived` in the group, in `[0, 1]`.
    pub rate: f64,
    pub count: usize,
}

/// A survival-rate bar chart, ready to be drawn or exported.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub bars: Vec<Bar>,
}

pub type ChartResult = Result<BarChart, NoData>;

/// Mean survival per (sex, class) cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalGrid {
    pub sexes: Vec<String>,
    pub classes: Vec<i64>,
    /// `rates[sex][class]`; `None` where no passenger falls in the cell.
    pub rates: Vec<Vec<Option<f64>>>,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Survival rate per age bucket, empty buckets omitted.
pub fn survival_by_age_bucket(table: &PassengerTable) -> ChartResult {
    check_input(table, &[columns::AGE, columns::SURVIVED])?;

    let groups = group_survival(table, columns::AGE, |p| {
        p.get(columns::AGE).as_f64().and_then(age_bucket)
    })?;

    Ok(BarChart {
        title: "Survival rate by age group",
        x_label: "Age group",
        bars: groups
            .into_iter()
            .map(|(bucket, acc)| {
                let label = format!(
                    "{}-{}",
                    AGE_BUCKET_EDGES[bucket], AGE_BUCKET_EDGES[bucket + 1]
                );
                acc.into_bar(label)
            })
            .collect(),
    })
}

/// Survival rate per sex, sexes in lexicographic order.
pub fn survival_by_sex(table: &PassengerTable) -> ChartResult {
    check_input(table, &[columns::SEX, columns::SURVIVED])?;

    let groups = group_survival(table, columns::SEX, |p| {
        p.get(columns::SEX).as_str().map(str::to_string)
    })?;

    Ok(BarChart {
        title: "Survival rate by sex",
        x_label: "Sex",
        bars: groups
            .into_iter()
            .map(|(sex, acc)| acc.into_bar(sex))
            .collect(),
    })
}

/// Survival rate per passenger class, classes ascending.
pub fn survival_by_class(table: &PassengerTable) -> ChartResult {
    check_input(table, &[columns::PCLASS, columns::SURVIVED])?;

    let groups = group_survival(table, columns::PCLASS, |p| p.get(columns::PCLASS).as_i64())?;

    Ok(BarChart {
        title: "Survival rate by class",
        x_label: "Class",
        bars: groups
            .into_iter()
            .map(|(class, acc)| acc.into_bar(class.to_string()))
            .collect(),
    })
}

/// Survival rate for every sex × class combination.
pub fn survival_by_sex_and_class(table: &PassengerTable) -> Result<SurvivalGrid, NoData> {
    check_input(table, &[columns::SEX, columns::PCLASS, columns::SURVIVED])?;

    let groups = group_survival(table, "Sex/Pclass", |p| {
        let sex = p.get(columns::SEX).as_str()?;
        let class = p.get(columns::PCLASS).as_i64()?;
        Some((sex.to_string(), class))
    })?;

    let mut sexes: Vec<String> = groups.keys().map(|(s, _)| s.clone()).collect();
    sexes.dedup();
    let mut classes: Vec<i64> = groups.keys().map(|(_, c)| *c).collect();
    classes.sort_unstable();
    classes.dedup();

    let rates = sexes
        .iter()
        .map(|sex| {
            classes
                .iter()
                .map(|class| groups.get(&(sex.clone(), *class)).map(Accumulator::rate))
                .collect()
        })
        .collect();

    Ok(SurvivalGrid {
        sexes,
        classes,
        rates,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_input(table: &PassengerTable, required: &[&str]) -> Result<(), NoData> {
    if table.is_empty() {
        return Err(NoData::EmptyTable);
    }
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(NoData::MissingColumns(missing));
    }
    Ok(())
}

/// Index into [`AGE_BUCKET_EDGES`] of the bucket holding `age`.
fn age_bucket(age: f64) -> Option<usize> {
    let last = AGE_BUCKET_EDGES.len() - 2;
    if age < AGE_BUCKET_EDGES[0] || age > AGE_BUCKET_EDGES[last + 1] {
        return None;
    }
    AGE_BUCKET_EDGES
        .windows(2)
        .position(|w| age >= w[0] && age < w[1])
        .or(Some(last))
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    survived: f64,
    count: usize,
}

impl Accumulator {
    fn rate(&self) -> f64 {
        self.survived / self.count as f64
    }

    fn into_bar(self, label: String) -> Bar {
        Bar {
            label,
            rate: self.rate(),
            count: self.count,
        }
    }
}

/// Group rows by `key`, skipping rows whose key or survival is missing.
/// `what` names the grouped values in the `NoValues` error.
fn group_survival<K: Ord>(
    table: &PassengerTable,
    what: &str,
    key: impl Fn(&Passenger) -> Option<K>,
) -> Result<BTreeMap<K, Accumulator>, NoData> {
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for p in &table.passengers {
        let Some(survived) = p.get(columns::SURVIVED).as_f64() else {
            continue;
        };
        let Some(k) = key(p) else {
            continue;
        };
        let acc = groups.entry(k).or_default();
        acc.survived += survived;
        acc.count += 1;
    }

    if groups.is_empty() {
        return Err(NoData::NoValues(what.to_string()));
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{sample_table, table_of};
    use crate::data::model::Value;
    use crate::data::prepare::prepare;

    fn labels(chart: &BarChart) -> Vec<&str> {
        chart.bars.iter().map(|b| b.label.as_str()).collect()
    }

    #[test]
    fn bucket_edges() {
        assert_eq!(age_bucket(0.0), Some(0));
        assert_eq!(age_bucket(9.99), Some(0));
        assert_eq!(age_bucket(10.0), Some(1));
        assert_eq!(age_bucket(80.0), Some(8));
        assert_eq!(age_bucket(100.0), Some(8));
        assert_eq!(age_bucket(100.5), None);
        assert_eq!(age_bucket(-1.0), None);
    }

    #[test]
    fn age_buckets_skip_empty_groups() {
        let chart = survival_by_age_bucket(&prepare(&sample_table())).unwrap();

        assert_eq!(labels(&chart), vec!["10-20", "20-30", "30-40"]);
        let twenties = &chart.bars[1];
        assert_eq!(twenties.count, 2);
        assert_eq!(twenties.rate, 0.5);
    }

    #[test]
    fn sex_rates_sorted_by_label() {
        let chart = survival_by_sex(&prepare(&sample_table())).unwrap();

        assert_eq!(labels(&chart), vec!["female", "male"]);
        assert_eq!(chart.bars[0].rate, 1.0);
        assert_eq!(chart.bars[1].rate, 0.0);
        assert_eq!(chart.bars[1].count, 2);
    }

    #[test]
    fn class_rates_sorted_ascending() {
        let chart = survival_by_class(&prepare(&sample_table())).unwrap();

        assert_eq!(labels(&chart), vec!["1", "2", "3"]);
        let rates: Vec<f64> = chart.bars.iter().map(|b| b.rate).collect();
        assert_eq!(rates, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn grid_leaves_empty_cells_blank() {
        let grid = survival_by_sex_and_class(&prepare(&sample_table())).unwrap();

        assert_eq!(grid.sexes, vec!["female".to_string(), "male".to_string()]);
        assert_eq!(grid.classes, vec![1, 2, 3]);
        assert_eq!(grid.rates[0], vec![Some(1.0), None, Some(1.0)]);
        assert_eq!(grid.rates[1], vec![None, Some(0.0), Some(0.0)]);
    }

    #[test]
    fn empty_table_is_no_data() {
        let empty = prepare(&sample_table()).select(&[]);

        assert_eq!(survival_by_age_bucket(&empty), Err(NoData::EmptyTable));
        assert_eq!(survival_by_sex(&empty), Err(NoData::EmptyTable));
        assert_eq!(survival_by_class(&empty), Err(NoData::EmptyTable));
        assert_eq!(survival_by_sex_and_class(&empty), Err(NoData::EmptyTable));
    }

    #[test]
    fn missing_columns_are_named() {
        let table = table_of(&[columns::SEX], vec![vec![Value::String("male".into())]]);

        assert_eq!(
            survival_by_sex(&table),
            Err(NoData::MissingColumns(vec![columns::SURVIVED.to_string()]))
        );
        assert_eq!(
            survival_by_age_bucket(&table),
            Err(NoData::MissingColumns(vec![
                columns::AGE.to_string(),
                columns::SURVIVED.to_string()
            ]))
        );
    }

    #[test]
    fn all_missing_values_are_no_data() {
        let table = table_of(
            &[columns::AGE, columns::SURVIVED],
            vec![vec![Value::Null, Value::Integer(1)], vec![Value::Float(30.0), Value::Null]],
        );

        assert!(matches!(survival_by_age_bucket(&table), Err(NoData::NoValues(_))));
    }
}
