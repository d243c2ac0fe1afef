//! Validation and filtering system
//!
//! Forms turn their field rules into an [`EntityValidationConfig`]; the
//! [`Validated`] extractor runs it before a write handler sees the payload.

pub mod config;
pub mod extractor;
pub mod filters;
pub mod validators;

pub use config::EntityValidationConfig;
pub use extractor::{Validated, ValidatableEntity};
