//! Route descriptor for the product resource

use super::handlers::{
    ProductAppState, attach_tag, bulk_delete, create_page, create_product, create_tag,
    delete_product, detach_tag, edit_page, form_schema, get_product, list_products, list_tags,
    restore_product, table_schema, update_column, update_product, validate_step,
};
use super::resource::ProductResource;
use super::store::ProductStores;
use crate::config::PaginationConfig;
use crate::resource::{NavigationItem, Resource};
use crate::server::ResourceDescriptor;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

/// Descriptor for the product resource
pub struct ProductDescriptor {
    pub resource: Arc<ProductResource>,
    pub stores: ProductStores,
    pub pagination: PaginationConfig,
}

impl ProductDescriptor {
    pub fn new(resource: ProductResource, stores: ProductStores, pagination: PaginationConfig) -> Self {
        Self {
            resource: Arc::new(resource),
            stores,
            pagination,
        }
    }
}

impl ResourceDescriptor for ProductDescriptor {
    fn slug(&self) -> &str {
        self.resource.slug()
    }

    fn navigation(&self, panel_path: &str) -> NavigationItem {
        self.resource.navigation(panel_path)
    }

    fn build_routes(&self, base_path: &str) -> Router {
        let state = ProductAppState {
            resource: self.resource.clone(),
            stores: self.stores.clone(),
            pagination: self.pagination.clone(),
            base_path: base_path.to_string(),
        };

        let mut router = Router::new();
        for page in self.resource.pages().routes {
            router = match page.name.as_str() {
                "index" => router.route(&page.path, get(list_products).post(create_product)),
                "create" => router.route(&page.path, get(create_page)),
                "edit" => router.route(&page.path, get(edit_page)),
                other => {
                    tracing::warn!(page = other, "no handler for page, skipping");
                    router
                }
            };
        }

        router
            .route("/create/steps/{step}", post(validate_step))
            .route("/bulk-actions/delete", post(bulk_delete))
            .route("/schema/form", get(form_schema))
            .route("/schema/table", get(table_schema))
            .route(
                "/{record}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/{record}/restore", post(restore_product))
            .route("/{record}/columns/{column}", patch(update_column))
            .route("/{record}/relations/tags", get(list_tags).post(create_tag))
            .route("/{record}/relations/tags/attach", post(attach_tag))
            .route("/{record}/relations/tags/{tag}", delete(detach_tag))
            .with_state(state)
    }
}
