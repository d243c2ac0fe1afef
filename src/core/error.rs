//! Typed error handling for the panel
//!
//! Request paths return [`PanelError`] so that clients can tell a missing
//! record from a rejected form without parsing messages.
//!
//! # Error Categories
//!
//! - [`RecordError`]: Errors related to record lookup and writes
//! - [`ValidationError`]: Field-level validation failures, surfaced inline
//! - [`RequestError`]: Malformed table queries and inline edits
//! - [`ConfigError`]: Configuration parsing and validation
//! - [`StorageError`]: Storage backend failures
//!
//! # Example
//!
//! ```rust,ignore
//! match store.get(&id).await? {
//!     Some(product) => Ok(Json(product)),
//!     None => Err(RecordError::NotFound { entity_type: "product".into(), id }.into()),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Field name → messages, in form declaration order
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// The main error type for the panel
#[derive(Debug, Error)]
pub enum PanelError {
    /// Record-related errors (CRUD operations)
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl PanelError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PanelError::Record(e) => e.status_code(),
            PanelError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PanelError::Request(_) => StatusCode::BAD_REQUEST,
            PanelError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PanelError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PanelError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PanelError::Record(e) => e.error_code(),
            PanelError::Validation(_) => "VALIDATION_ERROR",
            PanelError::Request(e) => e.error_code(),
            PanelError::Config(_) => "CONFIG_ERROR",
            PanelError::Storage(_) => "STORAGE_ERROR",
            PanelError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Shorthand for a single inline field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        PanelError::Validation(ValidationError::FieldErrors(errors))
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            PanelError::Record(RecordError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            PanelError::Record(RecordError::AlreadyExists {
                entity_type,
                field,
                value,
            }) => Some(serde_json::json!({
                "entity_type": entity_type,
                "field": field,
                "value": value
            })),
            PanelError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Record Errors
// =============================================================================

/// Errors related to record operations
#[derive(Debug, Error)]
pub enum RecordError {
    /// Record was not found (or is soft-deleted)
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    /// A unique attribute already holds this value
    #[error("{entity_type} with {field} '{value}' already exists")]
    AlreadyExists {
        entity_type: String,
        field: String,
        value: String,
    },

    /// Record operation failed
    #[error("Failed to {operation} {entity_type}: {message}")]
    OperationFailed {
        entity_type: String,
        operation: String,
        message: String,
    },
}

impl RecordError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecordError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecordError::AlreadyExists { .. } => StatusCode::CONFLICT,
            RecordError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RecordError::NotFound { .. } => "RECORD_NOT_FOUND",
            RecordError::AlreadyExists { .. } => "RECORD_ALREADY_EXISTS",
            RecordError::OperationFailed { .. } => "RECORD_OPERATION_FAILED",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields were rejected
    #[error("Validation failed for {} field(s)", .0.len())]
    FieldErrors(FieldErrors),
}

impl ValidationError {
    /// Access the per-field messages
    pub fn fields(&self) -> &FieldErrors {
        match self {
            ValidationError::FieldErrors(errors) => errors,
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to malformed requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// Generic bad request
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Path parameter could not be parsed as an id
    #[error("Invalid id: {value}")]
    InvalidId { value: String },

    /// The table has no column with this name
    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },

    /// The column is display-only
    #[error("Column '{column}' is not editable")]
    ColumnNotEditable { column: String },

    /// Sort requested on a column that is not sortable
    #[error("Column '{column}' is not sortable")]
    ColumnNotSortable { column: String },

    /// Search requested on a column that is not searchable that way
    #[error("Column '{column}' is not searchable")]
    ColumnNotSearchable { column: String },

    /// The wizard has no step with this index
    #[error("Unknown wizard step: {step}")]
    UnknownStep { step: usize },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::BadRequest { .. } => "BAD_REQUEST",
            RequestError::InvalidId { .. } => "INVALID_ID",
            RequestError::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            RequestError::ColumnNotEditable { .. } => "COLUMN_NOT_EDITABLE",
            RequestError::ColumnNotSortable { .. } => "COLUMN_NOT_SORTABLE",
            RequestError::ColumnNotSearchable { .. } => "COLUMN_NOT_SEARCHABLE",
            RequestError::UnknownStep { .. } => "UNKNOWN_STEP",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse a configuration file
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A configuration value is out of range
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// A lock guarding in-memory state was poisoned
    #[error("Storage lock poisoned: {message}")]
    LockPoisoned { message: String },

    /// Backend-specific failure
    #[error("{backend} error: {message}")]
    Backend { backend: String, message: String },
}

// =============================================================================
// Conversions
// =============================================================================

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        PanelError::Request(RequestError::BadRequest {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for PanelError {
    fn from(err: serde_yaml::Error) -> Self {
        PanelError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        PanelError::Internal(err.to_string())
    }
}

impl From<uuid::Error> for PanelError {
    fn from(err: uuid::Error) -> Self {
        PanelError::Request(RequestError::BadRequest {
            message: format!("Invalid UUID: {}", err),
        })
    }
}

impl From<validator::ValidationErrors> for PanelError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        let mut reported: Vec<_> = err.field_errors().into_iter().collect();
        reported.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, errors) in reported {
            let messages = errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid.", field.replace('_', " ")),
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        PanelError::Validation(ValidationError::FieldErrors(fields))
    }
}

impl From<anyhow::Error> for PanelError {
    fn from(err: anyhow::Error) -> Self {
        // Recover typed errors that were wrapped on the way up
        match err.downcast::<PanelError>() {
            Ok(panel) => panel,
            Err(err) => match err.downcast::<RecordError>() {
                Ok(record) => PanelError::Record(record),
                Err(err) => match err.downcast::<StorageError>() {
                    Ok(storage) => PanelError::Storage(storage),
                    Err(err) => PanelError::Internal(err.to_string()),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        let id = Uuid::nil();
        let err = RecordError::NotFound {
            entity_type: "product".to_string(),
            id,
        };
        assert_eq!(
            err.to_string(),
            format!("product with id '{}' not found", id)
        );
    }

    #[test]
    fn test_record_error_status_code() {
        let not_found = PanelError::from(RecordError::NotFound {
            entity_type: "product".to_string(),
            id: Uuid::new_v4(),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let exists = PanelError::from(RecordError::AlreadyExists {
            entity_type: "product".to_string(),
            field: "name".to_string(),
            value: "Widget".to_string(),
        });
        assert_eq!(exists.status_code(), StatusCode::CONFLICT);
        assert_eq!(exists.error_code(), "RECORD_ALREADY_EXISTS");
    }

    #[test]
    fn test_field_shorthand() {
        let err = PanelError::field("price", "The price field must be a number.");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let response = err.to_response();
        assert_eq!(response.code, "VALIDATION_ERROR");
        let details = response.details.expect("field errors carry details");
        assert_eq!(
            details["fields"]["price"][0],
            "The price field must be a number."
        );
    }

    #[test]
    fn test_field_errors_keep_order() {
        let mut errors = FieldErrors::new();
        errors.insert("name".to_string(), vec!["a".to_string()]);
        errors.insert("price".to_string(), vec!["b".to_string()]);
        errors.insert("description".to_string(), vec!["c".to_string()]);
        let err = ValidationError::FieldErrors(errors);
        let keys: Vec<_> = err.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "price", "description"]);
        assert_eq!(err.to_string(), "Validation failed for 3 field(s)");
    }

    #[test]
    fn test_request_errors_are_400() {
        let err = PanelError::from(RequestError::ColumnNotSortable {
            column: "status".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "COLUMN_NOT_SORTABLE");
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::ParseError {
            file: Some("panel.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config 'panel.yaml': bad indent"
        );
    }

    #[test]
    fn test_anyhow_recovers_record_error() {
        let err = anyhow::Error::new(RecordError::NotFound {
            entity_type: "tag".to_string(),
            id: Uuid::nil(),
        });
        let panel = PanelError::from(err);
        assert_eq!(panel.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_anyhow_plain_becomes_internal() {
        let panel = PanelError::from(anyhow::anyhow!("boom"));
        assert_eq!(panel.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(panel.to_string(), "Internal error: boom");
    }

    #[test]
    fn test_validator_errors_become_field_errors() {
        let mut errors = validator::ValidationErrors::new();
        let mut too_long = validator::ValidationError::new("length");
        too_long.message = Some("The name field must not be greater than 255 characters.".into());
        errors.add("name", too_long);
        errors.add("colour", validator::ValidationError::new("required"));

        let panel = PanelError::from(errors);
        assert_eq!(panel.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match panel {
            PanelError::Validation(e) => {
                assert_eq!(
                    e.fields()["name"],
                    vec!["The name field must not be greater than 255 characters."]
                );
                assert_eq!(e.fields()["colour"], vec!["The colour field is invalid."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
