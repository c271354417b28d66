use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Option<&'static str>,
    pub reason: String,
}

impl FieldError {
    pub fn new<M: Into<String>>(field: &'static str, reason: M) -> Self {
        Self {
            field: Some(field),
            reason: reason.into(),
        }
    }

    pub fn record<M: Into<String>>(reason: M) -> Self {
        Self {
            field: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "field `{}`: {}", field, self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for FieldError {}

pub(crate) fn as_object(value: &Value) -> Result<&Map<String, Value>, FieldError> {
    value
        .as_object()
        .ok_or_else(|| FieldError::record("record must be a JSON object"))
}

pub(crate) fn required_id(object: &Map<String, Value>) -> Result<u64, FieldError> {
    let value = object
        .get("id")
        .ok_or_else(|| FieldError::new("id", "missing"))?;
    match value.as_u64() {
        Some(id) if id > 0 => Ok(id),
        _ => Err(FieldError::new(
            "id",
            format!("must be a positive integer, got {value}"),
        )),
    }
}

pub(crate) fn required_text(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<String, FieldError> {
    let value = object
        .get(field)
        .ok_or_else(|| FieldError::new(field, "missing"))?;
    let text = value
        .as_str()
        .ok_or_else(|| FieldError::new(field, "must be a string"))?
        .trim();
    if text.is_empty() {
        return Err(FieldError::new(field, "must not be empty"));
    }
    Ok(text.to_string())
}

pub(crate) fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, FieldError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(FieldError::new(field, "must be a string or null")),
    }
}

pub(crate) fn optional_bool(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<bool>, FieldError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(_) => Err(FieldError::new(field, "must be a boolean")),
    }
}

pub(crate) fn string_list(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, FieldError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| FieldError::new(field, "must contain only strings"))
            })
            .collect(),
        Some(_) => Err(FieldError::new(field, "must be an array of strings")),
    }
}
