//! In-memory implementations of DataService and PivotService for testing and development

use crate::core::error::{RecordError, StorageError};
use crate::core::{Data, DataService, Pivot, PivotService, TrashScope};
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

fn poisoned(e: impl std::fmt::Display) -> StorageError {
    StorageError::LockPoisoned {
        message: e.to_string(),
    }
}

/// In-memory record store
///
/// Rows keep insertion order. Uses RwLock for thread-safe access; the
/// unique-field check runs under the same write lock as the insert.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    rows: Arc<RwLock<IndexMap<Uuid, T>>>,
}

impl<T> InMemoryDataService<T> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(IndexMap::new())),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn unique_conflict<T: Data>(
    rows: &IndexMap<Uuid, T>,
    candidate: &T,
    ignore: Option<Uuid>,
) -> Option<RecordError> {
    for field in T::unique_fields() {
        let Some(value) = candidate.field_value(field) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let clash = rows
            .values()
            .filter(|row| Some(row.id()) != ignore)
            .any(|row| row.field_value(field).as_ref() == Some(&value));
        if clash {
            return Some(RecordError::AlreadyExists {
                entity_type: T::resource_name_singular().to_string(),
                field: field.to_string(),
                value: value.to_text(),
            });
        }
    }
    None
}

#[async_trait]
impl<T: Data> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut rows = self.rows.write().map_err(poisoned)?;

        if let Some(conflict) = unique_conflict(&rows, &entity, None) {
            return Err(conflict.into());
        }

        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(id).filter(|row| !row.is_deleted()).cloned())
    }

    async fn list(&self, scope: TrashScope) -> Result<Vec<T>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows
            .values()
            .filter(|row| scope.admits(row.is_deleted()))
            .cloned()
            .collect())
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut rows = self.rows.write().map_err(poisoned)?;

        match rows.get(id) {
            Some(row) if !row.is_deleted() => {}
            _ => {
                return Err(RecordError::NotFound {
                    entity_type: T::resource_name_singular().to_string(),
                    id: *id,
                }
                .into());
            }
        }

        if let Some(conflict) = unique_conflict(&rows, &entity, Some(*id)) {
            return Err(conflict.into());
        }

        rows.insert(*id, entity.clone());
        Ok(entity)
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        match rows.get_mut(id) {
            Some(row) if !row.is_deleted() => {
                row.soft_delete();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn soft_delete_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let mut deleted = Vec::new();
        for id in ids {
            if let Some(row) = rows.get_mut(id) {
                if !row.is_deleted() {
                    row.soft_delete();
                    deleted.push(*id);
                }
            }
        }
        Ok(deleted)
    }

    async fn restore(&self, id: &Uuid) -> Result<Option<T>> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        match rows.get_mut(id) {
            Some(row) if row.is_deleted() => {
                row.restore();
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn exists_with(&self, field: &str, value: &str, ignore: Option<Uuid>) -> Result<bool> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows
            .values()
            .filter(|row| Some(row.id()) != ignore)
            .any(|row| {
                row.field_value(field)
                    .is_some_and(|v| !v.is_null() && v.to_text() == value)
            }))
    }
}

/// In-memory pivot store
#[derive(Clone)]
pub struct InMemoryPivotService {
    pivots: Arc<RwLock<IndexMap<Uuid, Pivot>>>,
}

impl InMemoryPivotService {
    pub fn new() -> Self {
        Self {
            pivots: Arc::new(RwLock::new(IndexMap::new())),
        }
    }
}

impl Default for InMemoryPivotService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PivotService for InMemoryPivotService {
    async fn attach(&self, relation: &str, source_id: Uuid, target_id: Uuid) -> Result<Pivot> {
        let mut pivots = self.pivots.write().map_err(poisoned)?;

        if let Some(existing) = pivots.values().find(|p| {
            p.relation == relation && p.source_id == source_id && p.target_id == target_id
        }) {
            return Ok(existing.clone());
        }

        let pivot = Pivot::new(relation, source_id, target_id);
        pivots.insert(pivot.id, pivot.clone());
        Ok(pivot)
    }

    async fn detach(&self, relation: &str, source_id: Uuid, target_id: Uuid) -> Result<bool> {
        let mut pivots = self.pivots.write().map_err(poisoned)?;
        let before = pivots.len();
        pivots.retain(|_, p| {
            !(p.relation == relation && p.source_id == source_id && p.target_id == target_id)
        });
        Ok(pivots.len() != before)
    }

    async fn related_ids(&self, relation: &str, source_id: &Uuid) -> Result<Vec<Uuid>> {
        let pivots = self.pivots.read().map_err(poisoned)?;
        Ok(pivots
            .values()
            .filter(|p| p.relation == relation && &p.source_id == source_id)
            .map(|p| p.target_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Entity, FieldValue};
    use chrono::{DateTime, Utc};

    #[derive(Clone, Debug)]
    struct Item {
        id: Uuid,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    }

    impl Item {
        fn new(name: &str) -> Self {
            let now = Utc::now();
            Self {
                id: Uuid::new_v4(),
                name: name.to_string(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            }
        }
    }

    impl Entity for Item {
        fn resource_name() -> &'static str {
            "items"
        }
        fn resource_name_singular() -> &'static str {
            "item"
        }
        fn id(&self) -> Uuid {
            self.id
        }
        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
        fn updated_at(&self) -> DateTime<Utc> {
            self.updated_at
        }
        fn deleted_at(&self) -> Option<DateTime<Utc>> {
            self.deleted_at
        }
        fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>) {
            self.deleted_at = deleted_at;
        }
        fn touch(&mut self) {
            self.updated_at = Utc::now();
        }
    }

    impl Data for Item {
        fn name(&self) -> &str {
            &self.name
        }
        fn unique_fields() -> &'static [&'static str] {
            &["name"]
        }
        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "name" => Some(FieldValue::from(self.name.as_str())),
                _ => None,
            }
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryDataService::new();
        let item = store.create(Item::new("lamp")).await.unwrap();
        let fetched = store.get(&item.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "lamp");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_unique_field() {
        let store = InMemoryDataService::new();
        store.create(Item::new("lamp")).await.unwrap();
        let err = store.create(Item::new("lamp")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecordError>(),
            Some(RecordError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_may_keep_own_unique_value() {
        let store = InMemoryDataService::new();
        let mut item = store.create(Item::new("lamp")).await.unwrap();
        item.touch();
        assert!(store.update(&item.id.clone(), item).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryDataService::new();
        let item = Item::new("ghost");
        let err = store.update(&item.id.clone(), item).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecordError>(),
            Some(RecordError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_but_keeps_row() {
        let store = InMemoryDataService::new();
        let item = store.create(Item::new("lamp")).await.unwrap();

        assert!(store.soft_delete(&item.id).await.unwrap());
        assert!(!store.soft_delete(&item.id).await.unwrap());
        assert!(store.get(&item.id).await.unwrap().is_none());
        assert!(store.list(TrashScope::WithoutTrashed).await.unwrap().is_empty());
        assert_eq!(store.list(TrashScope::OnlyTrashed).await.unwrap().len(), 1);

        // The trashed row still holds its unique name
        assert!(store.exists_with("name", "lamp", None).await.unwrap());
        assert!(store.create(Item::new("lamp")).await.is_err());
    }

    #[tokio::test]
    async fn test_soft_delete_many_reports_exact_set() {
        let store = InMemoryDataService::new();
        let a = store.create(Item::new("a")).await.unwrap();
        let b = store.create(Item::new("b")).await.unwrap();
        let c = store.create(Item::new("c")).await.unwrap();
        store.soft_delete(&b.id).await.unwrap();

        let deleted = store
            .soft_delete_many(&[a.id, b.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(deleted, vec![a.id]);

        let live = store.list(TrashScope::WithoutTrashed).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, c.id);
    }

    #[tokio::test]
    async fn test_restore() {
        let store = InMemoryDataService::new();
        let item = store.create(Item::new("lamp")).await.unwrap();
        store.soft_delete(&item.id).await.unwrap();
        let restored = store.restore(&item.id).await.unwrap().unwrap();
        assert!(!restored.is_deleted());
        assert!(store.restore(&item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists_with_ignores_record() {
        let store = InMemoryDataService::new();
        let item = store.create(Item::new("lamp")).await.unwrap();
        assert!(!store.exists_with("name", "lamp", Some(item.id)).await.unwrap());
        assert!(!store.exists_with("name", "desk", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemoryDataService::new();
        for name in ["c", "a", "b"] {
            store.create(Item::new(name)).await.unwrap();
        }
        let names: Vec<_> = store
            .list(TrashScope::WithoutTrashed)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_attach_is_idempotent() {
        let service = InMemoryPivotService::new();
        let product = Uuid::new_v4();
        let tag = Uuid::new_v4();

        let first = service.attach("product_tag", product, tag).await.unwrap();
        let second = service.attach("product_tag", product, tag).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            service.related_ids("product_tag", &product).await.unwrap(),
            vec![tag]
        );
    }

    #[tokio::test]
    async fn test_detach() {
        let service = InMemoryPivotService::new();
        let product = Uuid::new_v4();
        let tag = Uuid::new_v4();
        service.attach("product_tag", product, tag).await.unwrap();

        assert!(service.detach("product_tag", product, tag).await.unwrap());
        assert!(!service.detach("product_tag", product, tag).await.unwrap());
        assert!(service
            .related_ids("product_tag", &product)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_related_ids_scoped_by_relation() {
        let service = InMemoryPivotService::new();
        let product = Uuid::new_v4();
        service
            .attach("product_tag", product, Uuid::new_v4())
            .await
            .unwrap();
        service
            .attach("product_supplier", product, Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(
            service
                .related_ids("product_tag", &product)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
