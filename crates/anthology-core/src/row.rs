//! Result rows returned by [`Storage::query`](crate::store::Storage::query).

use crate::{Error, Result, statement::Value};

/// One result row: column names paired with their values, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
  columns: Vec<(String, Value)>,
}

impl Row {
  pub fn new() -> Self { Self::default() }

  /// Builder-style column append, mostly for backends and tests.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.push(name, value);
    self
  }

  pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.columns.push((name.into(), value.into()));
  }

  pub fn len(&self) -> usize { self.columns.len() }

  pub fn is_empty(&self) -> bool { self.columns.is_empty() }

  pub fn get(&self, name: &str) -> Result<&Value> {
    self
      .columns
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| v)
      .ok_or_else(|| Error::MissingColumn(name.to_owned()))
  }

  pub fn integer(&self, name: &str) -> Result<i64> {
    match self.get(name)? {
      Value::Integer(v) => Ok(*v),
      _ => Err(type_error(name, "an integer")),
    }
  }

  pub fn opt_integer(&self, name: &str) -> Result<Option<i64>> {
    match self.get(name)? {
      Value::Null => Ok(None),
      Value::Integer(v) => Ok(Some(*v)),
      _ => Err(type_error(name, "an integer or NULL")),
    }
  }

  /// Numeric column as `f64`; integer storage is widened.
  pub fn real(&self, name: &str) -> Result<f64> {
    match self.get(name)? {
      Value::Real(v) => Ok(*v),
      Value::Integer(v) => Ok(*v as f64),
      _ => Err(type_error(name, "numeric")),
    }
  }

  pub fn text(&self, name: &str) -> Result<String> {
    match self.get(name)? {
      Value::Text(v) => Ok(v.clone()),
      _ => Err(type_error(name, "text")),
    }
  }

  /// Text column where `NULL` reads as the empty string.
  pub fn text_or_empty(&self, name: &str) -> Result<String> {
    match self.get(name)? {
      Value::Null => Ok(String::new()),
      Value::Text(v) => Ok(v.clone()),
      _ => Err(type_error(name, "text or NULL")),
    }
  }
}

fn type_error(column: &str, expected: &'static str) -> Error {
  Error::ColumnType {
    column: column.to_owned(),
    expected,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn typed_getters() {
    let row = Row::new()
      .with("id", 3_i64)
      .with("value", 2_i64)
      .with("title", "春晓")
      .with("parentID", None::<i64>);

    assert_eq!(row.integer("id").unwrap(), 3);
    assert_eq!(row.real("value").unwrap(), 2.0);
    assert_eq!(row.text("title").unwrap(), "春晓");
    assert_eq!(row.opt_integer("parentID").unwrap(), None);
  }

  #[test]
  fn missing_column_and_wrong_type_are_errors() {
    let row = Row::new().with("id", "not a number");
    assert!(matches!(row.integer("nope"), Err(Error::MissingColumn(_))));
    assert!(matches!(row.integer("id"), Err(Error::ColumnType { .. })));
  }
}
