//! Error types for `anthology-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("row has no column named {0:?}")]
  MissingColumn(String),

  #[error("column {column:?} is not {expected}")]
  ColumnType {
    column:   String,
    expected: &'static str,
  },

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
