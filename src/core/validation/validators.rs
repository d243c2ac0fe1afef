//! Reusable field validators
//!
//! Every validator except `required` lets an absent (null) value through, so
//! optional fields are only checked when they carry a value.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn label(field: &str) -> String {
    field.replace('_', " ")
}

/// Null, a blank string and an empty array all count as "not provided"
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Whether a string reads as a number (integer, decimal or exponent form)
pub fn is_numeric_str(s: &str) -> bool {
    static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NUMERIC_REGEX.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$").unwrap()
    });
    regex.is_match(s)
}

/// Validator: field is required (not null, not blank)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if is_blank(value) {
            Err(format!("The {} field is required.", label(field)))
        } else {
            Ok(())
        }
    }
}

/// Validator: value is a JSON number or a numeric string
pub fn numeric() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::Number(_) => Ok(()),
        Value::String(s) if is_numeric_str(s) => Ok(()),
        _ => Err(format!("The {} field must be a number.", label(field))),
    }
}

/// Validator: string has at least `min` characters
pub fn min_length(min: usize) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if s.chars().count() < min {
                return Err(format!(
                    "The {} field must be at least {} characters.",
                    label(field),
                    min
                ));
            }
        }
        Ok(())
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if allowed.contains(s) => Ok(()),
        _ => Err(format!("The selected {} is invalid.", label(field))),
    }
}

/// Validator: value must be a boolean
pub fn boolean() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::Bool(_) => Ok(()),
        _ => Err(format!("The {} field must be true or false.", label(field))),
    }
}

/// Validator: value must be a UUID string
pub fn uuid() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if uuid::Uuid::parse_str(s).is_ok() => Ok(()),
        _ => Err(format!("The selected {} is invalid.", label(field))),
    }
}
