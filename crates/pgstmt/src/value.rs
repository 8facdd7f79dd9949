//! Typed bind values and the named value map.
//!
//! Predicates reference bind variables by *name*; the concrete values live in
//! a [`Values`] map supplied at build time. [`Value`] is a closed set of
//! tagged variants rather than a `dyn ToSql` bag, so a built argument list is
//! plain data: cloneable, comparable in tests, and handed to the driver
//! positionally without further inspection.

use bytes::BytesMut;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};

/// A bind value resolved from the value map during a build.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer (sent as the column's integer width)
    Int(i64),
    /// Double-precision float
    Float(f64),
    /// Text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// UUID
    Uuid(uuid::Uuid),
    /// Timestamp with time zone
    Timestamp(DateTime<Utc>),
    /// JSON document
    Json(serde_json::Value),
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql(ty, out),
            Value::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            Value::Text(v) => v.to_sql(ty, out),
            Value::Bytes(v) => v.to_sql(ty, out),
            Value::Uuid(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => v.to_sql(ty, out),
            Value::Json(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        [
            Type::BOOL,
            Type::INT2,
            Type::INT4,
            Type::INT8,
            Type::FLOAT4,
            Type::FLOAT8,
            Type::TEXT,
            Type::VARCHAR,
            Type::BPCHAR,
            Type::NAME,
            Type::UNKNOWN,
            Type::BYTEA,
            Type::UUID,
            Type::TIMESTAMPTZ,
            Type::JSON,
            Type::JSONB,
        ]
        .contains(ty)
    }

    to_sql_checked!();
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// The value map: bind names to values, supplied fresh per build call.
///
/// Statements never own values; they reference them by name, so the same
/// statement template can be built repeatedly against different maps.
///
/// # Example
/// ```ignore
/// let values = Values::new().set("minAge", 18).set("status", "active");
/// let built = stmt.build(&values)?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct Values {
    entries: HashMap<String, Value>,
}

impl Values {
    /// Create an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, chainable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Add a value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Look up a value by bind name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(18i32), Value::Int(18));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("abc"), Value::Text("abc".to_string()));
        assert_eq!(Value::from(1.5f64), Value::Float(1.5));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(7i64)), Value::Int(7));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_values_lookup() {
        let values = Values::new().set("minAge", 18).set("flag", true);
        assert_eq!(values.get("minAge"), Some(&Value::Int(18)));
        assert_eq!(values.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(values.get("missing"), None);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_values_from_iter() {
        let values: Values = [("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(values.get("b"), Some(&Value::Int(2)));
    }
}
