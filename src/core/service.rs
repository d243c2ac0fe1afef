//! Service traits for record storage and relationship pivots

use crate::core::{Data, link::Pivot};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Which rows a listing sees with respect to soft deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrashScope {
    /// Only rows that are not soft-deleted (the default scope)
    #[default]
    WithoutTrashed,
    /// Every row
    WithTrashed,
    /// Only soft-deleted rows
    OnlyTrashed,
}

impl TrashScope {
    pub fn admits(&self, deleted: bool) -> bool {
        match self {
            TrashScope::WithoutTrashed => !deleted,
            TrashScope::WithTrashed => true,
            TrashScope::OnlyTrashed => deleted,
        }
    }
}

/// Service trait for managing data records
///
/// Implementations enforce `Data::unique_fields` on create and update and
/// never purge rows: deletion is always a soft delete.
#[async_trait]
pub trait DataService<T: Data>: Send + Sync {
    /// Create a new record
    async fn create(&self, entity: T) -> Result<T>;

    /// Get a live (not soft-deleted) record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List records in the given trash scope, oldest first
    async fn list(&self, scope: TrashScope) -> Result<Vec<T>>;

    /// Replace an existing live record
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Soft delete a live record. Returns `false` if there was nothing to delete.
    async fn soft_delete(&self, id: &Uuid) -> Result<bool>;

    /// Soft delete every live record in `ids`; returns the ids actually deleted
    async fn soft_delete_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>>;

    /// Restore a soft-deleted record
    async fn restore(&self, id: &Uuid) -> Result<Option<T>>;

    /// Whether any row, trashed included, holds `value` in `field`,
    /// ignoring the row `ignore` (the record being edited)
    async fn exists_with(&self, field: &str, value: &str, ignore: Option<Uuid>) -> Result<bool>;
}

/// Service trait for many-to-many pivot rows
#[async_trait]
pub trait PivotService: Send + Sync {
    /// Associate `source_id` with `target_id`. Attaching twice is a no-op
    /// and returns the existing pivot.
    async fn attach(&self, relation: &str, source_id: Uuid, target_id: Uuid) -> Result<Pivot>;

    /// Remove an association. Returns `false` if it did not exist.
    async fn detach(&self, relation: &str, source_id: Uuid, target_id: Uuid) -> Result<bool>;

    /// Target ids associated with `source_id`, in attach order
    async fn related_ids(&self, relation: &str, source_id: &Uuid) -> Result<Vec<Uuid>>;
}
