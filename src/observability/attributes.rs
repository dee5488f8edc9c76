//! Typed span attribute values and the attribute keys the service records.

use opentelemetry::{KeyValue, Value};

pub const TASKS_RETRIEVED_QUANTITY: &str = "tasks_retrieved.quantity";
pub const TASK_DESCRIPTION: &str = "task_description";
pub const ADDED_TO_DB: &str = "added_to_db";
pub const TASK_ID: &str = "task_id";
pub const TASK_FOUND: &str = "task_found";
pub const TASK_TO_DELETE: &str = "task_to_delete";
pub const DELETED_FROM_DB: &str = "deleted_from_db";
pub const ERROR_TYPE: &str = "error.type";

/// Scalar value a span attribute may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl AttributeValue {
    /// Pair the value with `key` for the OpenTelemetry API.
    pub fn into_key_value(self, key: &'static str) -> KeyValue {
        KeyValue::new(key, Value::from(self))
    }
}

impl From<AttributeValue> for Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Str(s) => Value::from(s),
            AttributeValue::Int(i) => Value::I64(i),
            AttributeValue::Bool(b) => Value::Bool(b),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

// Values past i64::MAX saturate rather than wrap.
impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        AttributeValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}
