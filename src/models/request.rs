//! Operation request body sent through the gateway

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult, INVALID_BODY, INVALID_OPERATION, MISSING_OPERATION};

/// Sub-operation selected by the `operation` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Parsed request body: a JSON object with loosely typed fields
#[derive(Debug, Clone, Default)]
pub struct BookRequest {
    fields: Map<String, Value>,
}

impl BookRequest {
    /// Parse a serialized body. Anything but a JSON object is rejected.
    pub fn parse(body: &str) -> AppResult<Self> {
        let value: Value =
            serde_json::from_str(body).map_err(|_| AppError::bad_request(INVALID_BODY))?;
        Self::try_from(value)
    }

    /// Resolve the discriminator
    pub fn operation(&self) -> AppResult<Operation> {
        match self.fields.get("operation") {
            Some(value) if is_truthy(value) => match value.as_str() {
                Some("create") => Ok(Operation::Create),
                Some("update") => Ok(Operation::Update),
                Some("delete") => Ok(Operation::Delete),
                _ => Err(AppError::bad_request(INVALID_OPERATION)),
            },
            _ => Err(AppError::bad_request(MISSING_OPERATION)),
        }
    }

    /// True when the field is present with a non-empty value
    pub fn has(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(is_truthy)
    }

    /// Text of a present, non-empty field
    pub fn required(&self, name: &str) -> Option<String> {
        self.fields.get(name).filter(|v| is_truthy(v)).map(to_text)
    }

    /// Text of a present field, even an empty or null one
    pub fn present(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(to_text)
    }
}

impl TryFrom<Value> for BookRequest {
    type Error = AppError;

    fn try_from(value: Value) -> AppResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(AppError::bad_request(INVALID_BODY)),
        }
    }
}

/// Whether a value counts as supplied: not null, false, zero or empty
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Stored text form of a field value
fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
