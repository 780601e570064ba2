use super::model::{columns, PassengerTable, Value};
use crate::summary::median;

/// Identifier-like columns with no analytical use.
const DROPPED_COLUMNS: [&str; 3] = [columns::PASSENGER_ID, columns::TICKET, columns::CABIN];

/// Turn a raw table into the prepared table used everywhere else.
///
/// * missing `Age` is filled with the median of the known ages
/// * `Alone = (SibSp + Parch == 0)` is added when both counts exist
/// * `PassengerId`, `Ticket` and `Cabin` are removed
///
/// Absent columns simply skip the matching step.  The input is left as is.
pub fn prepare(raw: &PassengerTable) -> PassengerTable {
    let mut table = raw.clone();

    if table.has_column(columns::AGE) {
        impute_age(&mut table);
    }

    if table.has_column(columns::SIBSP) && table.has_column(columns::PARCH) {
        derive_alone(&mut table);
    }

    drop_columns(&mut table, &DROPPED_COLUMNS);
    table
}

fn impute_age(table: &mut PassengerTable) {
    let Some(fill) = median(&table.numeric_values(columns::AGE)) else {
        // nothing to take a median of; ages stay missing
        log::warn!("Age column has no known values, leaving it unimputed");
        return;
    };

    let mut filled = 0usize;
    for p in &mut table.passengers {
        if p.get(columns::AGE).is_null() {
            p.set(columns::AGE, Value::Float(fill));
            filled += 1;
        }
    }
    log::debug!("Filled {filled} missing ages with median {fill}");
}

fn derive_alone(table: &mut PassengerTable) {
    for p in &mut table.passengers {
        let sibsp = p.get(columns::SIBSP).as_f64();
        let parch = p.get(columns::PARCH).as_f64();
        // a missing count never makes a passenger alone
        let alone = matches!((sibsp, parch), (Some(s), Some(c)) if s + c == 0.0);
        p.set(columns::ALONE, Value::Bool(alone));
    }
    if !table.has_column(columns::ALONE) {
        table.column_names.push(columns::ALONE.to_string());
    }
}

fn drop_columns(table: &mut PassengerTable, names: &[&str]) {
    let present: Vec<&str> = names
        .iter()
        .copied()
        .filter(|c| table.has_column(c))
        .collect();
    if present.is_empty() {
        return;
    }

    table.column_names.retain(|c| !present.contains(&c.as_str()));
    for p in &mut table.passengers {
        for c in &present {
            p.fields.remove(*c);
        }
    }
    log::debug!("Dropped columns {present:?}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{sample_table, table_of};

    #[test]
    fn fills_missing_age_with_median() {
        let out = prepare(&sample_table());

        let ages: Vec<_> = out.column(columns::AGE).cloned().collect();
        assert_eq!(
            ages,
            vec![
                Value::Float(22.0),
                Value::Float(22.0),
                Value::Float(14.0),
                Value::Float(35.0)
            ]
        );
    }

    #[test]
    fn derives_alone_from_family_counts() {
        let out = prepare(&sample_table());

        let alone: Vec<_> = out
            .column(columns::ALONE)
            .map(|v| v.as_bool())
            .collect();
        assert_eq!(alone, vec![Some(false), Some(true), Some(false), Some(true)]);
        assert_eq!(out.column_names.last().map(String::as_str), Some(columns::ALONE));
    }

    #[test]
    fn drops_identifiers_and_keeps_embarked() {
        let out = prepare(&sample_table());

        for gone in DROPPED_COLUMNS {
            assert!(!out.has_column(gone));
            assert!(out.passengers.iter().all(|p| !p.fields.contains_key(gone)));
        }
        assert!(out.has_column(columns::EMBARKED));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn source_table_is_untouched() {
        let raw = sample_table();
        let before = raw.clone();
        let _ = prepare(&raw);
        assert_eq!(raw, before);
    }

    #[test]
    fn tolerates_absent_columns() {
        let raw = table_of(&[columns::SEX], vec![vec![Value::String("male".into())]]);

        let out = prepare(&raw);

        assert_eq!(out, raw);
    }

    #[test]
    fn all_missing_ages_stay_missing() {
        let raw = table_of(
            &[columns::AGE, columns::SIBSP],
            vec![vec![Value::Null, Value::Integer(0)]; 3],
        );

        let out = prepare(&raw);

        assert!(out.column(columns::AGE).all(Value::is_null));
        // Parch is absent, so no Alone column
        assert!(!out.has_column(columns::ALONE));
    }

    #[test]
    fn missing_count_is_not_alone() {
        let raw = table_of(
            &[columns::SIBSP, columns::PARCH],
            vec![
                vec![Value::Null, Value::Integer(0)],
                vec![Value::Integer(0), Value::Integer(0)],
            ],
        );

        let out = prepare(&raw);

        let alone: Vec<_> = out.column(columns::ALONE).cloned().collect();
        assert_eq!(alone, vec![Value::Bool(false), Value::Bool(true)]);
    }
}
