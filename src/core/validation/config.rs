//! Per-entity validation configuration

use crate::core::error::FieldErrors;
use anyhow::Result;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

type Validator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;
type Filter = Arc<dyn Fn(&str, Value) -> Result<Value> + Send + Sync>;

#[derive(Default, Clone)]
struct FieldRules {
    filters: Vec<Filter>,
    validators: Vec<Validator>,
}

/// Filters and validators for every field of one entity operation
///
/// Fields are kept in registration order so that error maps follow the
/// order in which the form declares its inputs.
#[derive(Clone)]
pub struct EntityValidationConfig {
    entity_type: String,
    fields: IndexMap<String, FieldRules>,
}

impl EntityValidationConfig {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Declare a field with no rules so it is kept in the validated payload
    pub fn add_field(&mut self, field: &str) {
        self.fields.entry(field.to_string()).or_default();
    }

    pub fn add_validator<F>(&mut self, field: &str, validator: F)
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.fields
            .entry(field.to_string())
            .or_default()
            .validators
            .push(Arc::new(validator));
    }

    pub fn add_filter<F>(&mut self, field: &str, filter: F)
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.fields
            .entry(field.to_string())
            .or_default()
            .filters
            .push(Arc::new(filter));
    }

    /// Names of the configured fields, in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Filter then validate every configured field.
    ///
    /// Unknown keys are dropped from the returned object. Missing keys are
    /// validated as null so `required` still fires.
    pub fn validate_and_filter(&self, payload: Value) -> Result<Value, FieldErrors> {
        let names: Vec<String> = self.fields.keys().cloned().collect();
        self.validate_fields(payload, &names)
    }

    /// Same as [`validate_and_filter`](Self::validate_and_filter) restricted
    /// to a subset of fields (e.g. one wizard step)
    pub fn validate_fields(&self, payload: Value, only: &[String]) -> Result<Value, FieldErrors> {
        let mut input = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let mut output = Map::new();
        let mut errors = FieldErrors::new();

        for (field, rules) in &self.fields {
            if !only.contains(field) {
                continue;
            }

            let mut value = input.remove(field).unwrap_or(Value::Null);
            for filter in &rules.filters {
                value = match filter(field, value) {
                    Ok(v) => v,
                    Err(e) => {
                        errors.entry(field.clone()).or_default().push(e.to_string());
                        Value::Null
                    }
                };
            }

            for validator in &rules.validators {
                if let Err(message) = validator(field, &value) {
                    errors.entry(field.clone()).or_default().push(message);
                }
            }

            output.insert(field.clone(), value);
        }

        if errors.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(errors)
        }
    }
}
