//! Pivot rows backing many-to-many relationships

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a many-to-many join table (e.g. `product_tag`)
///
/// Pivots only carry ids and the relationship name, so the same store can
/// hold any number of relationships.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pivot {
    /// Unique identifier for this pivot row
    pub id: Uuid,

    /// Relationship name (e.g., "product_tag")
    pub relation: String,

    /// Owning side (the product)
    pub source_id: Uuid,

    /// Related side (the tag)
    pub target_id: Uuid,

    /// When the association was made
    pub created_at: DateTime<Utc>,
}

impl Pivot {
    pub fn new(relation: impl Into<String>, source_id: Uuid, target_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            relation: relation.into(),
            source_id,
            target_id,
            created_at: Utc::now(),
        }
    }
}

/// A relationship declared on a model: its name and the attribute used to
/// display the related record
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Relationship {
    pub name: String,
    pub title_attribute: String,
}

impl Relationship {
    pub fn new(name: impl Into<String>, title_attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title_attribute: title_attribute.into(),
        }
    }
}
