//! Firestore's typed JSON document encoding.
//!
//! Every field value travels as a single-key object naming its type, e.g.
//! `{"stringValue": "Tomato"}` or `{"integerValue": "3"}` (64-bit integers are
//! string-encoded).

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiResult;
use crate::error::BackendError;
use crate::price::Price;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(serde_json::Value),
    MapValue(MapValue),
    ArrayValue(ArrayValue),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self::StringValue(s.into())
    }

    pub fn integer(i: i64) -> Self {
        Self::IntegerValue(i.to_string())
    }

    pub fn optional_string(s: Option<&str>) -> Self {
        match s {
            Some(s) => Self::string(s),
            None => Self::NullValue(()),
        }
    }

    pub fn timestamp(t: DateTime<Utc>) -> Self {
        Self::TimestampValue(t.to_rfc3339())
    }

    pub fn map(fields: Fields) -> Self {
        Self::MapValue(MapValue { fields })
    }

    pub fn array(values: Vec<Value>) -> Self {
        Self::ArrayValue(ArrayValue { values })
    }
}

/// The `fields` object of a document or map value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn string(&self, key: &str) -> ApiResult<String> {
        self.opt_string(key)?.ok_or_else(|| missing(key))
    }

    /// A string field that may be absent or null.
    pub fn opt_string(&self, key: &str) -> ApiResult<Option<String>> {
        match self.get(key) {
            None | Some(Value::NullValue(())) => Ok(None),
            Some(Value::StringValue(s)) => Ok(Some(s.clone())),
            Some(other) => Err(wrong_type(key, "string", other)),
        }
    }

    pub fn integer(&self, key: &str) -> ApiResult<i64> {
        match self.get(key) {
            Some(Value::IntegerValue(s)) => s
                .parse()
                .map_err(|_| BackendError::Decode(format!("field '{key}' is not an integer: {s}"))),
            Some(Value::DoubleValue(d)) if d.fract() == 0.0 => Ok(*d as i64),
            Some(Value::StringValue(s)) => s
                .trim()
                .parse()
                .map_err(|_| BackendError::Decode(format!("field '{key}' is not an integer: {s}"))),
            None => Err(missing(key)),
            Some(other) => Err(wrong_type(key, "integer", other)),
        }
    }

    /// A price stored as rupees in any numeric form, including the
    /// string-typed prices older documents carry (e.g. `"150"`).
    pub fn price(&self, key: &str) -> ApiResult<Price> {
        match self.get(key) {
            Some(Value::IntegerValue(s)) | Some(Value::StringValue(s)) => Price::new_from_str(s)
                .map_err(|e| BackendError::Decode(format!("field '{key}': {e}"))),
            Some(Value::DoubleValue(d)) => Ok(Price::new_from_float(*d)),
            None => Err(missing(key)),
            Some(other) => Err(wrong_type(key, "price", other)),
        }
    }

    pub fn timestamp(&self, key: &str) -> ApiResult<DateTime<Utc>> {
        match self.get(key) {
            Some(Value::TimestampValue(s)) => DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| BackendError::Decode(format!("field '{key}': {e}"))),
            None => Err(missing(key)),
            Some(other) => Err(wrong_type(key, "timestamp", other)),
        }
    }

    pub fn array(&self, key: &str) -> ApiResult<&[Value]> {
        match self.get(key) {
            Some(Value::ArrayValue(a)) => Ok(&a.values),
            None | Some(Value::NullValue(())) => Ok(&[]),
            Some(other) => Err(wrong_type(key, "array", other)),
        }
    }
}

fn missing(key: &str) -> BackendError {
    BackendError::Decode(format!("missing field '{key}'"))
}

fn wrong_type(key: &str, expected: &str, found: &Value) -> BackendError {
    BackendError::Decode(format!("field '{key}' should be {expected}, found {found:?}"))
}

/// A stored document as returned by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, `projects/<p>/databases/(default)/documents/<path>`.
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default, skip_serializing)]
    pub update_time: Option<String>,
}

impl Document {
    /// The last path segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Request body for create/patch calls.
#[derive(Debug, Serialize)]
pub struct DocumentBody<'a> {
    pub fields: &'a Fields,
}
