//! Resource registry for managing resource descriptors and mounting their routes

use crate::resource::NavigationItem;
use axum::Router;
use indexmap::IndexMap;

/// Trait that describes how to mount one admin resource
///
/// Each resource (products, orders, ...) implements this trait to provide
/// its page and action routes.
pub trait ResourceDescriptor: Send + Sync {
    /// URL segment under the panel path (e.g., "products")
    fn slug(&self) -> &str;

    /// Navigation entry for the panel menu
    fn navigation(&self, panel_path: &str) -> NavigationItem;

    /// Build the routes for this resource, relative to its own base path
    ///
    /// `base_path` is the absolute path the router will be nested under
    /// (e.g. `/admin/products`), for building page URLs.
    fn build_routes(&self, base_path: &str) -> Router;
}

/// Registry for all resources of a panel
///
/// Resources are kept in registration order; registering a slug twice
/// replaces the earlier descriptor.
#[derive(Default)]
pub struct ResourceRegistry {
    descriptors: IndexMap<String, Box<dyn ResourceDescriptor>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: IndexMap::new(),
        }
    }

    /// Register a resource descriptor, keyed by its slug
    pub fn register(&mut self, descriptor: Box<dyn ResourceDescriptor>) {
        let slug = descriptor.slug().to_string();
        self.descriptors.insert(slug, descriptor);
    }

    /// Nest every resource router under `{panel_path}/{slug}`
    pub fn build_routes(&self, panel_path: &str) -> Router {
        let mut router = Router::new();

        for (slug, descriptor) in &self.descriptors {
            let base = format!("{}/{}", panel_path.trim_end_matches('/'), slug);
            tracing::debug!(resource = %slug, path = %base, "mounting resource");
            router = router.nest(&base, descriptor.build_routes(&base));
        }

        router
    }

    /// Navigation entries, ordered by sort then label
    pub fn navigation(&self, panel_path: &str) -> Vec<NavigationItem> {
        let mut items: Vec<NavigationItem> = self
            .descriptors
            .values()
            .map(|d| d.navigation(panel_path))
            .collect();
        items.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.label.cmp(&b.label)));
        items
    }

    /// Get all registered slugs
    pub fn slugs(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    /// Minimal mock ResourceDescriptor for testing
    struct MockDescriptor {
        slug: String,
        label: String,
        sort: i32,
    }

    impl MockDescriptor {
        fn new(slug: &str, label: &str, sort: i32) -> Self {
            Self {
                slug: slug.to_string(),
                label: label.to_string(),
                sort,
            }
        }
    }

    impl ResourceDescriptor for MockDescriptor {
        fn slug(&self) -> &str {
            &self.slug
        }

        fn navigation(&self, panel_path: &str) -> NavigationItem {
            NavigationItem {
                label: self.label.clone(),
                icon: "heroicon-o-squares".to_string(),
                sort: self.sort,
                url: format!("{}/{}", panel_path, self.slug),
            }
        }

        fn build_routes(&self, base_path: &str) -> Router {
            let base = base_path.to_string();
            Router::new().route("/", get(move || async move { base }))
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ResourceRegistry::new();
        assert!(registry.slugs().is_empty());
        assert!(registry.navigation("/admin").is_empty());
    }

    #[test]
    fn test_register_keeps_order_and_replaces_duplicates() {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(MockDescriptor::new("products", "Products", 2)));
        registry.register(Box::new(MockDescriptor::new("orders", "Orders", 1)));
        registry.register(Box::new(MockDescriptor::new("products", "Items", 3)));
        assert_eq!(registry.slugs(), vec!["products", "orders"]);
    }

    #[test]
    fn test_navigation_sorted() {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(MockDescriptor::new("products", "Products", 2)));
        registry.register(Box::new(MockDescriptor::new("orders", "Orders", 1)));
        registry.register(Box::new(MockDescriptor::new("customers", "Customers", 2)));
        let labels: Vec<_> = registry
            .navigation("/admin")
            .into_iter()
            .map(|n| n.label)
            .collect();
        assert_eq!(labels, vec!["Orders", "Customers", "Products"]);
    }

    #[tokio::test]
    async fn test_routes_are_nested_under_panel_path() {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(MockDescriptor::new("orders", "Orders", 1)));
        let server = axum_test::TestServer::try_new(registry.build_routes("/admin/")).unwrap();

        let response = server.get("/admin/orders").await;
        response.assert_status_ok();
        response.assert_text("/admin/orders");
    }
}
