//! Parameterized statements.
//!
//! A [`Statement`] pairs SQL text with its positional arguments. The text can
//! only be assembled from `&'static str` fragments, so caller-supplied data
//! has exactly one way in: [`Statement::bind`]. Placeholders are plain `?`.

use std::fmt;

// ─── Value ───────────────────────────────────────────────────────────────────

/// A single SQL value, either bound as an argument or read back in a
/// [`Row`](crate::row::Row).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

impl Value {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }
}

impl From<i64> for Value {
  fn from(v: i64) -> Self { Self::Integer(v) }
}

impl From<f64> for Value {
  fn from(v: f64) -> Self { Self::Real(v) }
}

impl From<String> for Value {
  fn from(v: String) -> Self { Self::Text(v) }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self { Self::Text(v.to_owned()) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => f.write_str("NULL"),
      Value::Integer(v) => write!(f, "{v}"),
      Value::Real(v) => write!(f, "{v}"),
      Value::Text(v) => write!(f, "{v:?}"),
    }
  }
}

// ─── Statement ───────────────────────────────────────────────────────────────

/// SQL text plus the arguments bound to its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
  sql:  String,
  args: Vec<Value>,
}

impl Statement {
  pub fn new(sql: &'static str) -> Self {
    Self {
      sql:  sql.to_owned(),
      args: Vec::new(),
    }
  }

  /// Append a fragment of SQL text, separated from the existing text by a
  /// single space.
  pub fn push(mut self, fragment: &'static str) -> Self {
    self.sql.push(' ');
    self.sql.push_str(fragment);
    self
  }

  /// Bind the next positional argument.
  pub fn bind(mut self, value: impl Into<Value>) -> Self {
    self.args.push(value.into());
    self
  }

  pub fn sql(&self) -> &str { &self.sql }

  pub fn args(&self) -> &[Value] { &self.args }

  /// The SQL text with runs of whitespace collapsed, for logging.
  pub fn compact_sql(&self) -> String {
    self.sql.split_whitespace().collect::<Vec<_>>().join(" ")
  }

  /// Number of `?` placeholders in the text.
  pub fn placeholder_count(&self) -> usize {
    self.sql.matches('?').count()
  }
}
