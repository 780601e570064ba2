/// Data layer: core types, loading, preparation and filtering.
///
/// Architecture:
/// ```text
///  <root>/data/Titanic-Dataset.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → raw PassengerTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ prepare   │  impute Age, derive Alone, drop identifiers
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec predicates → filtered table
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod prepare;

#[cfg(test)]
pub mod fixtures;
