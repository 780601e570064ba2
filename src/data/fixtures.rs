//! Small in-memory Titanic-like table shared by the unit tests.
//!
//! Includes a missing `Age`, a missing `Embarked` and a missing `Cabin` so
//! preparation and filtering see realistic gaps.

use super::model::{columns, Passenger, PassengerTable, Value};

pub fn sample_table() -> PassengerTable {
    let header = [
        columns::SURVIVED,
        columns::PCLASS,
        columns::SEX,
        columns::AGE,
        columns::SIBSP,
        columns::PARCH,
        columns::FARE,
        columns::EMBARKED,
        columns::PASSENGER_ID,
        columns::TICKET,
        columns::CABIN,
    ];
    let rows: [[Value; 11]; 4] = [
        [
            Value::Integer(0),
            Value::Integer(3),
            text("male"),
            Value::Float(22.0),
            Value::Integer(1),
            Value::Integer(0),
            Value::Float(7.25),
            text("S"),
            Value::Integer(1),
            text("A/5 21171"),
            Value::Null,
        ],
        [
            Value::Integer(1),
            Value::Integer(1),
            text("female"),
            Value::Null,
            Value::Integer(0),
            Value::Integer(0),
            Value::Float(71.2833),
            text("C"),
            Value::Integer(2),
            text("PC 17599"),
            text("C85"),
        ],
        [
            Value::Integer(1),
            Value::Integer(3),
            text("female"),
            Value::Float(14.0),
            Value::Integer(1),
            Value::Integer(2),
            Value::Float(7.925),
            text("S"),
            Value::Integer(3),
            text("STON/O2. 3101282"),
            Value::Null,
        ],
        [
            Value::Integer(0),
            Value::Integer(2),
            text("male"),
            Value::Float(35.0),
            Value::Integer(0),
            Value::Integer(0),
            Value::Float(13.0),
            Value::Null,
            Value::Integer(4),
            text("113803"),
            Value::Null,
        ],
    ];

    table_of(&header, rows.into_iter().map(Vec::from).collect())
}

/// Build a table with only the given columns, one `Vec` per row.
pub fn table_of(header: &[&str], rows: Vec<Vec<Value>>) -> PassengerTable {
    let passengers = rows
        .into_iter()
        .map(|row| Passenger {
            fields: header.iter().map(|c| c.to_string()).zip(row).collect(),
        })
        .collect();
    PassengerTable::new(header.iter().map(|c| c.to_string()).collect(), passengers)
}

fn text(s: &str) -> Value {
    Value::String(s.to_string())
}
