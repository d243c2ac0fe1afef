//! Core module containing fundamental traits and types for the panel

pub mod entity;
pub mod error;
pub mod field;
pub mod link;
pub mod query;
pub mod service;
pub mod validation;

pub use entity::{Data, Entity};
pub use error::{FieldErrors, PanelError};
pub use field::FieldValue;
pub use link::{Pivot, Relationship};
pub use query::{PaginatedResponse, PaginationMeta, Sort, SortDirection, TableQuery};
pub use service::{DataService, PivotService, TrashScope};
