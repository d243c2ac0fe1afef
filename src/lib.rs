//! # Product Panel
//!
//! An admin-panel resource framework served over axum, with a complete
//! resource for products.
//!
//! ## Features
//!
//! - **Declarative Resources**: Forms, tables, filters, actions and pages built as data
//! - **Wizard Forms**: Multi-step forms with per-step validation
//! - **Inline Editing**: Text input, select and toggle columns validated per cell
//! - **Table Queries**: Filters, global and per-column search, sorting, pagination
//! - **Relation Managers**: Attach, detach and create related records
//! - **Soft Delete Support**: Built-in soft deletion with deleted_at, single and bulk, plus restore
//! - **Configuration-Based**: Panel path, currency and pagination from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use panel::prelude::*;
//!
//! let config = PanelConfig::default();
//! let stores = ProductStores::in_memory();
//!
//! ServerBuilder::new()
//!     .with_config(config.clone())
//!     .register(ProductDescriptor::new(
//!         ProductResource::new(&config.panel.currency),
//!         stores,
//!         config.pagination.clone(),
//!     ))
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod products;
pub mod resource;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Data, Entity},
        error::{FieldErrors, PanelError},
        field::FieldValue,
        link::{Pivot, Relationship},
        query::{PaginatedResponse, PaginationMeta, Sort, SortDirection, TableQuery},
        service::{DataService, PivotService, TrashScope},
        validation::{EntityValidationConfig, ValidatableEntity, Validated},
    };

    // === Macros ===
    pub use crate::{impl_entity, impl_named_record};

    // === Resources ===
    pub use crate::resource::{
        Action, BulkActionGroup, Column, Field, Form, NavigationItem, Pages, RelationManager,
        Resource, Table, TableFilter,
    };

    // === Products ===
    pub use crate::products::{
        Category, Product, ProductDescriptor, ProductResource, ProductStatus, ProductStores, Tag,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryDataService, InMemoryPivotService};

    // === Config ===
    pub use crate::config::{PaginationConfig, PanelConfig, PanelSettings, ServerConfig};

    // === Server ===
    pub use crate::server::{ResourceDescriptor, ResourceRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, State},
        routing::{delete, get, post, put},
    };
}
