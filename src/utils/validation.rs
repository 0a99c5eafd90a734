use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};

pub fn validate<T: Validate>(val: &T) -> std::result::Result<(), validator::ValidationErrors> {
    val.validate()
}

/// An integer as it may arrive from a form: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerInput {
    Number(serde_json::Number),
    Text(String),
}

impl IntegerInput {
    /// Strict conversion: fractional numbers and non-numeric text are rejected
    /// instead of being truncated.
    pub fn to_i64(&self, field: &str) -> Result<i64> {
        match self {
            IntegerInput::Number(n) => n
                .as_i64()
                .ok_or_else(|| Error::BadRequest(format!("{} must be an integer", field))),
            IntegerInput::Text(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::BadRequest(format!("{} must be an integer", field))),
        }
    }
}

impl From<i64> for IntegerInput {
    fn from(value: i64) -> Self {
        IntegerInput::Number(value.into())
    }
}

pub fn required_integer(value: Option<&IntegerInput>, field: &str) -> Result<i64> {
    value
        .ok_or_else(|| Error::BadRequest(format!("Missing required field: {}", field)))?
        .to_i64(field)
}

pub fn required_text(value: Option<&str>, field: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::BadRequest(format!("Missing required field: {}", field))),
    }
}
