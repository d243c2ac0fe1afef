//! Product HTTP handlers

use super::model::{Product, ProductInput, Tag};
use super::resource::{ProductResource, TAGS_PIVOT};
use super::store::ProductStores;
use crate::config::PaginationConfig;
use crate::core::error::{FieldErrors, PanelError, RecordError, RequestError, ValidationError};
use crate::core::query::{TableQuery, paginate};
use crate::core::validation::Validated;
use crate::core::{Data, Entity};
use crate::resource::{Form, Resource, Table};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Product-specific AppState
#[derive(Clone)]
pub struct ProductAppState {
    pub resource: Arc<ProductResource>,
    pub stores: ProductStores,
    pub pagination: PaginationConfig,
    /// Absolute path of the resource, e.g. `/admin/products`
    pub base_path: String,
}

impl ProductAppState {
    fn page_url(&self, page: &str, record: Option<Uuid>) -> Option<String> {
        self.resource.pages().url(&self.base_path, page, record)
    }

    async fn find_product(&self, id: Uuid) -> Result<Product, PanelError> {
        self.stores.products.get(&id).await?.ok_or_else(|| {
            RecordError::NotFound {
                entity_type: Product::resource_name_singular().to_string(),
                id,
            }
            .into()
        })
    }

    async fn form_with_options(&self) -> Result<Form, PanelError> {
        let options = self.stores.category_options().await?;
        Ok(self.resource.form().with_relationship_options("category", options))
    }

    async fn render(&self, table: &Table<Product>, product: &Product) -> Result<Value, PanelError> {
        let related = self.stores.related_records(product).await?;
        Ok(json!({
            "id": product.id,
            "record": product,
            "cells": table.render_row(product, &related),
            "actions": table.record_actions(product),
            "urls": {
                "edit": self.page_url("edit", Some(product.id)),
            },
        }))
    }

    /// Rules that need the stores: unique values and related records that
    /// must exist. `only` restricts the check to some fields.
    async fn store_rule_errors(
        &self,
        form: &Form,
        payload: &Value,
        record: Option<Uuid>,
        only: Option<&[String]>,
    ) -> Result<FieldErrors, PanelError> {
        let wanted = |field: &str| only.is_none_or(|names| names.iter().any(|n| n == field));
        let mut errors = FieldErrors::new();

        for (field, ignore_record) in form.unique_fields() {
            if !wanted(field) {
                continue;
            }
            let value = match payload.get(field) {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                _ => continue,
            };
            let ignore = if ignore_record { record } else { None };
            if self.stores.products.exists_with(field, &value, ignore).await? {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push(format!("The {} has already been taken.", field.replace('_', " ")));
            }
        }

        for (field, relationship) in form.relationship_fields() {
            if !wanted(field) || relationship.name != "category" {
                continue;
            }
            let Some(Ok(id)) = payload.get(field).and_then(Value::as_str).map(Uuid::parse_str)
            else {
                continue;
            };
            if self.stores.categories.get(&id).await?.is_none() {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push(format!("The selected {} is invalid.", relationship.name));
            }
        }

        Ok(errors)
    }

    /// Turn a payload that passed the form's own rules into product input
    async fn product_input(&self, payload: &Value, record: Option<Uuid>) -> Result<ProductInput, PanelError> {
        let form = self.resource.form();
        let mut errors = self.store_rule_errors(&form, payload, record, None).await?;

        let input = match ProductInput::from_payload(payload) {
            Ok(input) => Some(input),
            Err(PanelError::Validation(ValidationError::FieldErrors(more))) => {
                for (field, messages) in more {
                    errors.entry(field).or_default().extend(messages);
                }
                None
            }
            Err(other) => return Err(other),
        };

        match input {
            Some(input) if errors.is_empty() => Ok(input),
            _ => {
                tracing::warn!(
                    entity_type = "product",
                    fields = ?errors.keys().collect::<Vec<_>>(),
                    "rejected payload"
                );
                Err(ValidationError::FieldErrors(errors).into())
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<Uuid, PanelError> {
    Uuid::parse_str(raw).map_err(|_| {
        RequestError::InvalidId {
            value: raw.to_string(),
        }
        .into()
    })
}

/// Index page: filtered, searched, sorted and paginated rows
pub async fn list_products(
    State(state): State<ProductAppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, PanelError> {
    let query = TableQuery::from_pairs(params);
    tracing::debug!(?query, "listing products");

    let options = state.stores.category_options().await?;
    let table = state.resource.table().with_relationship_options("category", options);

    let records = state.stores.products.list(table.trash_scope(&query)?).await?;
    let records = table.apply(records, &query)?;
    let page = paginate(records, query.page(), query.per_page(&state.pagination));

    let mut rows = Vec::with_capacity(page.data.len());
    for product in &page.data {
        rows.push(state.render(&table, product).await?);
    }

    let empty_state_actions = if page.pagination.total == 0 {
        json!(table.empty_state_actions)
    } else {
        json!([])
    };

    Ok(Json(json!({
        "title": state.resource.label(),
        "data": rows,
        "pagination": page.pagination,
        "filters": table.filters,
        "filters_layout": table.filters_layout,
        "filters_form_columns": table.filters_form_columns,
        "actions": table.actions,
        "bulk_actions": table.bulk_actions,
        "empty_state_actions": empty_state_actions,
        "urls": {
            "create": state.page_url("create", None),
        },
    })))
}

/// Create page: the empty form with relationship options loaded
pub async fn create_page(State(state): State<ProductAppState>) -> Result<Json<Value>, PanelError> {
    let form = state.form_with_options().await?;
    Ok(Json(json!({
        "title": "Create product",
        "form": form,
        "urls": {
            "submit": state.page_url("index", None),
            "cancel": state.page_url("index", None),
        },
    })))
}

pub async fn create_product(
    State(state): State<ProductAppState>,
    payload: Validated<ProductResource>,
) -> Result<(StatusCode, Json<Value>), PanelError> {
    let input = state.product_input(&payload, None).await?;
    let product = state.stores.products.create(Product::new(input)).await?;

    tracing::info!(id = %product.id, name = %product.name, "product created");

    let table = state.resource.table();
    Ok((StatusCode::CREATED, Json(state.render(&table, &product).await?)))
}

/// Validate one wizard step before moving to the next
pub async fn validate_step(
    State(state): State<ProductAppState>,
    Path(step): Path<String>,
    Json(payload): Json<Value>,
) -> Result<StatusCode, PanelError> {
    let step: usize = step.parse().map_err(|_| RequestError::BadRequest {
        message: format!("invalid step '{}'", step),
    })?;

    let form = state.resource.form();
    let names: Vec<String> = form
        .step_fields(step)
        .ok_or(RequestError::UnknownStep { step })?
        .iter()
        .map(|f| f.name.clone())
        .collect();

    let config = form.validation_config("product");
    let mut errors = match config.validate_fields(payload.clone(), &names) {
        Ok(_) => FieldErrors::new(),
        Err(errors) => errors,
    };
    let store_errors = state
        .store_rule_errors(&form, &payload, None, Some(&names))
        .await?;
    for (field, messages) in store_errors {
        errors.entry(field).or_default().extend(messages);
    }

    if errors.is_empty() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ValidationError::FieldErrors(errors).into())
    }
}

pub async fn get_product(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, PanelError> {
    let product = state.find_product(parse_id(&id)?).await?;
    let table = state.resource.table();
    Ok(Json(state.render(&table, &product).await?))
}

/// Edit page: the form filled with the record, plus its relation managers
pub async fn edit_page(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, PanelError> {
    let product = state.find_product(parse_id(&id)?).await?;
    let form = state.form_with_options().await?.fill(&product.attributes());

    let relations: Vec<Value> = state
        .resource
        .relations()
        .into_iter()
        .map(|manager| {
            let url = format!("{}/{}/relations/{}", state.base_path, product.id, manager.name);
            json!({ "manager": manager, "url": url })
        })
        .collect();

    Ok(Json(json!({
        "title": format!("Edit {}", product.name),
        "record": product.id,
        "form": form,
        "relations": relations,
        "actions": [crate::resource::Action::delete()],
        "urls": {
            "submit": format!("{}/{}", state.base_path, product.id),
            "cancel": state.page_url("index", None),
        },
    })))
}

pub async fn update_product(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
    payload: Validated<ProductResource>,
) -> Result<Json<Value>, PanelError> {
    let mut product = state.find_product(parse_id(&id)?).await?;
    let input = state.product_input(&payload, Some(product.id)).await?;
    product.apply_input(input);

    let product = state.stores.products.update(&product.id, product.clone()).await?;
    tracing::info!(id = %product.id, "product updated");

    let table = state.resource.table();
    Ok(Json(state.render(&table, &product).await?))
}

#[derive(Debug, Deserialize)]
pub struct ColumnUpdate {
    #[serde(default)]
    pub value: Value,
}

/// Inline edit of one editable cell
pub async fn update_column(
    State(state): State<ProductAppState>,
    Path((id, column)): Path<(String, String)>,
    Json(body): Json<ColumnUpdate>,
) -> Result<Json<Value>, PanelError> {
    let id = parse_id(&id)?;
    let table = state.resource.table();
    let value = table.editable_column(&column)?.validate_state(body.value)?;
    let mut product = state.find_product(id).await?;

    let form = state.resource.form();
    let mut payload = serde_json::Map::new();
    payload.insert(column.clone(), value.clone());
    let payload = Value::Object(payload);
    let errors = state
        .store_rule_errors(&form, &payload, Some(id), Some(std::slice::from_ref(&column)))
        .await?;
    if !errors.is_empty() {
        tracing::warn!(%id, column = %column, "rejected inline edit");
        return Err(ValidationError::FieldErrors(errors).into());
    }

    product.apply_column(&column, &value)?;
    let product = state.stores.products.update(&id, product).await?;
    tracing::info!(%id, column = %column, "product cell updated");

    Ok(Json(state.render(&table, &product).await?))
}

pub async fn delete_product(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, PanelError> {
    let id = parse_id(&id)?;
    if !state.stores.products.soft_delete(&id).await? {
        return Err(RecordError::NotFound {
            entity_type: Product::resource_name_singular().to_string(),
            id,
        }
        .into());
    }
    tracing::info!(%id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Bring a soft-deleted product back into the default listing
pub async fn restore_product(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, PanelError> {
    let id = parse_id(&id)?;
    let product = state.stores.products.restore(&id).await?.ok_or_else(|| {
        PanelError::from(RecordError::NotFound {
            entity_type: Product::resource_name_singular().to_string(),
            id,
        })
    })?;
    tracing::info!(%id, "product restored");

    let table = state.resource.table();
    Ok(Json(state.render(&table, &product).await?))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Soft delete every selected row
pub async fn bulk_delete(
    State(state): State<ProductAppState>,
    Json(body): Json<BulkDeleteRequest>,
) -> Result<Json<Value>, PanelError> {
    if !state.resource.table().has_bulk_action("delete") {
        return Err(RequestError::BadRequest {
            message: "bulk delete is not offered".to_string(),
        }
        .into());
    }
    if body.ids.is_empty() {
        return Err(PanelError::field("ids", "Select at least one record."));
    }

    let ids = body
        .ids
        .iter()
        .map(|raw| parse_id(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let deleted = state.stores.products.soft_delete_many(&ids).await?;
    tracing::info!(selected = ids.len(), deleted = deleted.len(), "products bulk deleted");

    Ok(Json(json!({
        "deleted": deleted.len(),
        "records": deleted,
    })))
}

pub async fn form_schema(State(state): State<ProductAppState>) -> Result<Json<Value>, PanelError> {
    Ok(Json(json!(state.form_with_options().await?)))
}

pub async fn table_schema(State(state): State<ProductAppState>) -> Result<Json<Value>, PanelError> {
    let options = state.stores.category_options().await?;
    let table = state.resource.table().with_relationship_options("category", options);
    Ok(Json(table.schema()))
}

fn tag_json(tags: &[Tag]) -> Value {
    json!(
        tags.iter()
            .map(|t| json!({ "id": t.id, "name": t.name() }))
            .collect::<Vec<_>>()
    )
}

/// Tags relation manager: attached tags
pub async fn list_tags(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, PanelError> {
    let product = state.find_product(parse_id(&id)?).await?;
    let tags = state.stores.tags_of(&product.id).await?;
    Ok(Json(json!({
        "relation": "tags",
        "data": tag_json(&tags),
        "count": tags.len(),
    })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 1, max = 255, message = "The name field must be between 1 and 255 characters."))]
    pub name: String,
}

/// Tags relation manager: create a tag and attach it
pub async fn create_tag(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
    Json(mut input): Json<TagInput>,
) -> Result<(StatusCode, Json<Value>), PanelError> {
    let product = state.find_product(parse_id(&id)?).await?;
    input.name = input.name.trim().to_string();
    input.validate()?;

    if state.stores.tags.exists_with("name", &input.name, None).await? {
        return Err(PanelError::field("name", "The name has already been taken."));
    }

    let tag = state.stores.tags.create(Tag::new(input.name)).await?;
    state.stores.pivots.attach(TAGS_PIVOT, product.id, tag.id).await?;
    tracing::info!(product = %product.id, tag = %tag.id, "tag created and attached");

    Ok((StatusCode::CREATED, Json(json!({ "id": tag.id, "name": tag.name }))))
}

#[derive(Debug, Deserialize)]
pub struct AttachRequest {
    pub tag_id: String,
}

/// Tags relation manager: attach an existing tag
pub async fn attach_tag(
    State(state): State<ProductAppState>,
    Path(id): Path<String>,
    Json(body): Json<AttachRequest>,
) -> Result<Json<Value>, PanelError> {
    let product = state.find_product(parse_id(&id)?).await?;
    let tag_id = parse_id(&body.tag_id)?;
    if state.stores.tags.get(&tag_id).await?.is_none() {
        return Err(RecordError::NotFound {
            entity_type: Tag::resource_name_singular().to_string(),
            id: tag_id,
        }
        .into());
    }

    state.stores.pivots.attach(TAGS_PIVOT, product.id, tag_id).await?;
    tracing::info!(product = %product.id, tag = %tag_id, "tag attached");

    let tags = state.stores.tags_of(&product.id).await?;
    Ok(Json(json!({
        "relation": "tags",
        "data": tag_json(&tags),
        "count": tags.len(),
    })))
}

/// Tags relation manager: detach a tag (the tag itself is kept)
pub async fn detach_tag(
    State(state): State<ProductAppState>,
    Path((id, tag)): Path<(String, String)>,
) -> Result<StatusCode, PanelError> {
    let product = state.find_product(parse_id(&id)?).await?;
    let tag_id = parse_id(&tag)?;
    if !state.stores.pivots.detach(TAGS_PIVOT, product.id, tag_id).await? {
        return Err(RecordError::NotFound {
            entity_type: Tag::resource_name_singular().to_string(),
            id: tag_id,
        }
        .into());
    }
    tracing::info!(product = %product.id, tag = %tag_id, "tag detached");
    Ok(StatusCode::NO_CONTENT)
}
