//! Entity traits defining the core abstraction for all panel records

use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all records managed by the panel.
///
/// All entities have:
/// - id: Unique identifier
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
/// - deleted_at: Soft deletion timestamp (optional)
///
/// Soft deletion only stamps `deleted_at`; the row stays in storage.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "products", "categories")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "product", "category")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Get the deletion timestamp (soft delete)
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Overwrite the deletion timestamp
    fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>);

    /// Update the updated_at timestamp to now
    fn touch(&mut self);

    /// Check if the entity has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Soft delete this entity (sets deleted_at timestamp)
    fn soft_delete(&mut self) {
        self.set_deleted_at(Some(Utc::now()));
        self.touch();
    }

    /// Restore a soft-deleted entity (clears deleted_at timestamp)
    fn restore(&mut self) {
        self.set_deleted_at(None);
        self.touch();
    }
}

/// Trait for data entities that carry named, queryable attributes.
///
/// Data entities extend the base Entity with:
/// - name: A human-readable name used as the relationship title attribute
/// - unique_fields: attributes that must not repeat across rows
/// - field_value: Dynamic field access for filters, search and sorting
pub trait Data: Entity {
    /// Get the name of this data entity
    fn name(&self) -> &str;

    /// Fields whose values must be unique across all rows, trashed included
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}
