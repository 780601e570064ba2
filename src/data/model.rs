use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column names of the passenger dataset
// ---------------------------------------------------------------------------

pub mod columns {
    pub const SURVIVED: &str = "Survived";
    pub const PCLASS: &str = "Pclass";
    pub const SEX: &str = "Sex";
    pub const AGE: &str = "Age";
    pub const SIBSP: &str = "SibSp";
    pub const PARCH: &str = "Parch";
    pub const FARE: &str = "Fare";
    pub const EMBARKED: &str = "Embarked";
    pub const ALONE: &str = "Alone";
    pub const PASSENGER_ID: &str = "PassengerId";
    pub const TICKET: &str = "Ticket";
    pub const CABIN: &str = "Cabin";
}

// ---------------------------------------------------------------------------
// Value – a single cell of the passenger table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, inferred per CSV field.
/// Used as a `BTreeSet` key for distinct values, so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

static NULL: Value = Value::Null;

// -- Manual Eq/Ord so Value can key a BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.2}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the value as an integer label (e.g. a passenger class).
    /// Floats with no fractional part count too.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Missing cell: an empty CSV field or a NaN float.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Whether the value counts as numeric for `describe`-style statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Text written to a CSV export.  Floats keep a decimal point so the
    /// column reads back as float.
    pub fn to_csv_field(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(v) if v.is_nan() => String::new(),
            Value::Float(v) => format!("{v:?}"),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Null => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Passenger – one row of the table
// ---------------------------------------------------------------------------

/// A single passenger record (one row of the source CSV).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Passenger {
    /// Dynamic columns: column_name → value.
    pub fields: BTreeMap<String, Value>,
}

impl Passenger {
    /// Cell for `column`; absent columns read as [`Value::Null`].
    pub fn get(&self, column: &str) -> &Value {
        self.fields.get(column).unwrap_or(&NULL)
    }

    pub fn set(&mut self, column: &str, value: Value) {
        self.fields.insert(column.to_string(), value);
    }
}

// ---------------------------------------------------------------------------
// PassengerTable – the complete in-memory dataset
// ---------------------------------------------------------------------------

/// An ordered set of passengers sharing one column layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassengerTable {
    /// All passengers (rows), in source order.
    pub passengers: Vec<Passenger>,
    /// Column names in source order.
    pub column_names: Vec<String>,
}

impl PassengerTable {
    pub fn new(column_names: Vec<String>, passengers: Vec<Passenger>) -> Self {
        PassengerTable {
            passengers,
            column_names,
        }
    }

    /// Number of passengers.
    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn n_cols(&self) -> usize {
        self.column_names.len()
    }

    /// Capability check used before any column-specific operation.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// All cells of one column, in row order.
    pub fn column(&self, column: &str) -> impl Iterator<Item = &Value> + '_ {
        let column = column.to_string();
        self.passengers.iter().map(move |p| p.get(&column))
    }

    /// The non-missing numeric cells of a column.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.column(column).filter_map(Value::as_f64).collect()
    }

    /// Sorted distinct non-missing values of a column.
    pub fn distinct_values(&self, column: &str) -> BTreeSet<Value> {
        self.column(column)
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }

    /// Count of missing cells across every column and row.
    pub fn missing_total(&self) -> usize {
        self.passengers
            .iter()
            .map(|p| {
                self.column_names
                    .iter()
                    .filter(|c| p.get(c).is_null())
                    .count()
            })
            .sum()
    }

    /// A new table with the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> PassengerTable {
        PassengerTable {
            passengers: indices
                .iter()
                .filter_map(|&i| self.passengers.get(i).cloned())
                .collect(),
            column_names: self.column_names.clone(),
        }
    }
}
