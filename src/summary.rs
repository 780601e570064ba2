use crate::data::model::{columns, PassengerTable};

// ---------------------------------------------------------------------------
// Order statistics
// ---------------------------------------------------------------------------

/// Linear-interpolated quantile of an ascending slice (`q` in `[0, 1]`).
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of the finite values, `None` if there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    quantile(&sorted, 0.5)
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// Key figures shown above the data grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub rows: usize,
    pub cols: usize,
    pub missing_total: usize,
    /// Mean of the 0/1 `Survived` values; only with a `Survived` column and rows.
    pub survival_rate: Option<f64>,
}

pub fn overview(table: &PassengerTable) -> Overview {
    let survival_rate = if table.has_column(columns::SURVIVED) && !table.is_empty() {
        mean(&table.numeric_values(columns::SURVIVED))
    } else {
        None
    };

    Overview {
        rows: table.len(),
        cols: table.n_cols(),
        missing_total: table.missing_total(),
        survival_rate,
    }
}

// ---------------------------------------------------------------------------
// describe()-style statistics
// ---------------------------------------------------------------------------

/// Statistics of one numeric column.  Fields are `None` where the value is
/// undefined (no values, or a single value for `std`).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    pub const HEADERS: [&'static str; 9] =
        ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    fn from_values(column: &str, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        NumericSummary {
            column: column.to_string(),
            count: values.len(),
            mean: mean(&values),
            std: sample_std(&values),
            min: values.first().copied(),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }

    /// The eight statistics after the column name, in header order.
    pub fn cells(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Describe {
    /// One row per numeric column, in table column order.
    Columns(Vec<NumericSummary>),
    /// Placeholder when nothing is numeric.
    Info(String),
}

/// Describe every numeric column of `table`.
///
/// A column is numeric when it holds nothing but numbers or missing cells;
/// booleans do not count.  An empty table has no numeric columns.
pub fn numeric_describe(table: &PassengerTable) -> Describe {
    let summaries: Vec<NumericSummary> = table
        .column_names
        .iter()
        .filter(|c| is_numeric_column(table, c))
        .map(|c| NumericSummary::from_values(c, table.numeric_values(c)))
        .collect();

    if summaries.is_empty() {
        Describe::Info("No numeric columns to describe.".to_string())
    } else {
        Describe::Columns(summaries)
    }
}

fn is_numeric_column(table: &PassengerTable, column: &str) -> bool {
    // a column of blanks reads as float, like an all-NaN dataframe column
    !table.is_empty() && table.column(column).all(|v| v.is_numeric() || v.is_null())
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{sample_table, table_of};
    use crate::data::model::Value;
    use crate::data::prepare::prepare;

    #[test]
    fn median_of_odd_and_even_counts() {
        assert_eq!(median(&[22.0, 14.0, 35.0]), Some(22.0));
        assert_eq!(median(&[1.0, 4.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[f64::NAN]), None);
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&v, 0.25), Some(2.0));
        assert_eq!(quantile(&[0.0, 10.0], 0.75), Some(7.5));
    }

    #[test]
    fn overview_counts_shape_missing_and_rate() {
        let raw = sample_table();

        let ov = overview(&raw);

        assert_eq!(ov.rows, 4);
        assert_eq!(ov.cols, 11);
        // one Age, one Embarked, three Cabin
        assert_eq!(ov.missing_total, 5);
        assert_eq!(ov.survival_rate, Some(0.5));

        let prepared = overview(&prepare(&raw));
        assert_eq!(prepared.cols, 9);
        assert_eq!(prepared.missing_total, 1);
    }

    #[test]
    fn survival_rate_needs_rows_and_column() {
        let empty = table_of(&[columns::SURVIVED], vec![]);
        assert_eq!(overview(&empty).survival_rate, None);

        let no_col = table_of(&[columns::SEX], vec![vec![Value::String("male".into())]]);
        assert_eq!(overview(&no_col).survival_rate, None);
    }

    #[test]
    fn describe_covers_numeric_columns_only() {
        let Describe::Columns(rows) = numeric_describe(&prepare(&sample_table())) else {
            panic!("expected numeric columns");
        };

        let names: Vec<_> = rows.iter().map(|r| r.column.as_str()).collect();
        assert_eq!(
            names,
            vec![
                columns::SURVIVED,
                columns::PCLASS,
                columns::AGE,
                columns::SIBSP,
                columns::PARCH,
                columns::FARE
            ]
        );

        let age = &rows[2];
        assert_eq!(age.count, 4);
        assert_eq!(age.min, Some(14.0));
        assert_eq!(age.median, Some(22.0));
        assert_eq!(age.max, Some(35.0));
        assert_eq!(age.mean, Some(23.25));
    }

    #[test]
    fn describe_without_numbers_returns_placeholder() {
        let table = table_of(&[columns::SEX], vec![vec![Value::String("male".into())]]);
        assert!(matches!(numeric_describe(&table), Describe::Info(_)));
    }

    #[test]
    fn blank_column_is_described_with_zero_count() {
        let table = table_of(
            &[columns::SEX, columns::FARE],
            vec![
                vec![Value::String("male".into()), Value::Null],
                vec![Value::String("female".into()), Value::Null],
            ],
        );

        let Describe::Columns(rows) = numeric_describe(&table) else {
            panic!("expected numeric columns");
        };

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column, columns::FARE);
        assert_eq!(rows[0].count, 0);
        assert!(rows[0].cells()[1..].iter().all(Option::is_none));
    }

    #[test]
    fn empty_table_has_nothing_to_describe() {
        let empty = prepare(&sample_table()).select(&[]);
        assert!(matches!(numeric_describe(&empty), Describe::Info(_)));
    }

    #[test]
    fn single_value_has_no_std() {
        let table = table_of(&[columns::FARE], vec![vec![Value::Float(7.25)]]);
        let Describe::Columns(rows) = numeric_describe(&table) else {
            panic!("expected numeric columns");
        };
        assert_eq!(rows[0].std, None);
        assert_eq!(rows[0].mean, Some(7.25));
    }
}
