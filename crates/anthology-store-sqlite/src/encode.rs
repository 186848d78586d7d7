//! Conversion between [`anthology_core::statement::Value`] and rusqlite's
//! value types.

use anthology_core::statement::Value;
use rusqlite::types::{Value as SqlValue, ValueRef};

pub fn encode_value(v: &Value) -> SqlValue {
  match v {
    Value::Null => SqlValue::Null,
    Value::Integer(i) => SqlValue::Integer(*i),
    Value::Real(f) => SqlValue::Real(*f),
    Value::Text(s) => SqlValue::Text(s.clone()),
  }
}

pub fn encode_args(args: &[Value]) -> Vec<SqlValue> {
  args.iter().map(encode_value).collect()
}

/// Blobs have no counterpart in [`Value`]; they are read as lossy UTF-8.
pub fn decode_value(v: ValueRef<'_>) -> Value {
  match v {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => Value::Integer(i),
    ValueRef::Real(f) => Value::Real(f),
    ValueRef::Text(b) | ValueRef::Blob(b) => {
      Value::Text(String::from_utf8_lossy(b).into_owned())
    }
  }
}
