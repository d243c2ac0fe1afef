//! Axum extractor for validated payloads
//!
//! This module provides the `Validated<T>` extractor that filters and
//! validates request payloads before they reach handlers.

use super::config::EntityValidationConfig;
use crate::core::error::{PanelError, RequestError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Trait for types that know how to validate their write payloads
///
/// Resources implement this from their form schema.
pub trait ValidatableEntity {
    /// Get the validation configuration for a specific operation
    /// (`"create"` or `"update"`)
    fn validation_config(operation: &str) -> EntityValidationConfig;
}

/// Axum extractor that validates and filters a JSON payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_product(
///     State(state): State<ProductAppState>,
///     payload: Validated<ProductResource>,
/// ) -> Result<Json<Product>, PanelError> {
///     // payload only holds declared fields, already trimmed and checked
/// }
/// ```
pub struct Validated<T>(pub Value, std::marker::PhantomData<T>);

impl<T> Validated<T> {
    /// Create a new validated payload
    pub fn new(payload: Value) -> Self {
        Self(payload, std::marker::PhantomData)
    }

    /// Get the inner payload
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatableEntity + Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();

        let Json(payload): Json<Value> = match Json::from_request(req, state).await {
            Ok(json) => json,
            Err(e) => {
                return Err(PanelError::from(RequestError::BadRequest {
                    message: format!("Invalid JSON: {}", e.body_text()),
                })
                .into_response());
            }
        };

        let operation = match method.as_str() {
            "PUT" | "PATCH" => "update",
            _ => "create",
        };

        let config = T::validation_config(operation);

        match config.validate_and_filter(payload) {
            Ok(validated) => Ok(Validated::new(validated)),
            Err(errors) => {
                tracing::warn!(
                    entity_type = config.entity_type(),
                    operation,
                    fields = ?errors.keys().collect::<Vec<_>>(),
                    "rejected payload"
                );
                Err(PanelError::from(ValidationError::FieldErrors(errors)).into_response())
            }
        }
    }
}
