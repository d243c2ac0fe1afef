//! Page routes, relation managers and navigation entries

use crate::core::link::Relationship;
use serde::Serialize;
use uuid::Uuid;

/// Placeholder for the record id in page paths
pub const RECORD_PARAM: &str = "{record}";

/// A named page and its path relative to the resource slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRoute {
    pub name: String,
    pub path: String,
}

impl PageRoute {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }

    /// Whether the path needs a record id
    pub fn is_record_page(&self) -> bool {
        self.path.contains(RECORD_PARAM)
    }
}

/// The pages a resource exposes, in declaration order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pages {
    pub routes: Vec<PageRoute>,
}

impl Pages {
    pub fn new(routes: Vec<PageRoute>) -> Self {
        Self { routes }
    }

    pub fn get(&self, name: &str) -> Option<&PageRoute> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Resolve a page URL under `base` (e.g. `/admin/products`).
    ///
    /// Returns `None` for an unknown page or a record page without a record.
    pub fn url(&self, base: &str, name: &str, record: Option<Uuid>) -> Option<String> {
        let route = self.get(name)?;
        let path = if route.is_record_page() {
            route.path.replace(RECORD_PARAM, &record?.to_string())
        } else {
            route.path.clone()
        };
        let base = base.trim_end_matches('/');
        Some(match path.as_str() {
            "/" | "" => base.to_string(),
            other => format!("{}{}", base, other),
        })
    }
}

/// A nested table managing a to-many relationship from the edit page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationManager {
    pub name: String,
    pub title: String,
    pub relationship: Relationship,
}

impl RelationManager {
    pub fn new(relationship: &str, title_attribute: &str) -> Self {
        let mut title: String = relationship.replace('_', " ");
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self {
            name: relationship.to_string(),
            title,
            relationship: Relationship::new(relationship, title_attribute),
        }
    }
}

/// Entry in the panel's navigation menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub label: String,
    pub icon: String,
    pub sort: i32,
    pub url: String,
}
