//! Storage handles for the product resource

use super::model::{Category, Product, Tag};
use super::resource::TAGS_PIVOT;
use crate::core::service::{DataService, PivotService, TrashScope};
use crate::core::Data;
use crate::resource::table::{Attributes, Related, RelatedRecords};
use crate::storage::{InMemoryDataService, InMemoryPivotService};
use anyhow::Result;
use indexmap::IndexMap;
use std::sync::Arc;
use uuid::Uuid;

/// Stores backing products and the records they relate to
#[derive(Clone)]
pub struct ProductStores {
    pub products: Arc<dyn DataService<Product>>,
    pub categories: Arc<dyn DataService<Category>>,
    pub tags: Arc<dyn DataService<Tag>>,
    pub pivots: Arc<dyn PivotService>,
}

fn attributes<T: Data>(record: &T, names: &[&str]) -> Attributes {
    names
        .iter()
        .filter_map(|name| record.field_value(name).map(|v| (name.to_string(), v)))
        .collect()
}

impl ProductStores {
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryDataService::<Product>::new()),
            categories: Arc::new(InMemoryDataService::<Category>::new()),
            tags: Arc::new(InMemoryDataService::<Tag>::new()),
            pivots: Arc::new(InMemoryPivotService::new()),
        }
    }

    /// Live categories as select options, id → name
    pub async fn category_options(&self) -> Result<IndexMap<String, String>> {
        Ok(self
            .categories
            .list(TrashScope::WithoutTrashed)
            .await?
            .into_iter()
            .map(|c| (c.id.to_string(), c.name))
            .collect())
    }

    /// Live tags attached to a product, in attach order
    pub async fn tags_of(&self, product_id: &Uuid) -> Result<Vec<Tag>> {
        let mut tags = Vec::new();
        for id in self.pivots.related_ids(TAGS_PIVOT, product_id).await? {
            if let Some(tag) = self.tags.get(&id).await? {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    /// Related records needed to render a product row
    pub async fn related_records(&self, product: &Product) -> Result<RelatedRecords> {
        let category = match product.category_id {
            Some(id) => self.categories.get(&id).await?,
            None => None,
        };
        let tags = self.tags_of(&product.id).await?;

        let mut related = RelatedRecords::new();
        related.insert(
            "category".to_string(),
            Related::One(category.map(|c| attributes(&c, &["id", "name"]))),
        );
        related.insert(
            "tags".to_string(),
            Related::Many(tags.iter().map(|t| attributes(t, &["id", "name"])).collect()),
        );
        Ok(related)
    }
}
