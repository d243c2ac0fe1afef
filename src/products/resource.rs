//! The product admin resource

use super::model::{Product, ProductStatus};
use crate::core::query::SortDirection;
use crate::core::validation::{EntityValidationConfig, ValidatableEntity};
use crate::core::FieldValue;
use crate::resource::{
    Action, Alignment, BulkActionGroup, Column, Component, DateOperator, Field, FiltersLayout,
    Form, PageRoute, Pages, RelationManager, Resource, Rule, Step, Table, TableFilter,
};

pub const NAVIGATION_ICON: &str = "heroicon-o-rectangle-stack";

/// Relation name of the product ↔ tag pivot rows
pub const TAGS_PIVOT: &str = "product_tag";

/// Forms, table and pages for [`Product`]
#[derive(Debug, Clone)]
pub struct ProductResource {
    currency: String,
}

impl Default for ProductResource {
    fn default() -> Self {
        Self::new("usd")
    }
}

impl ProductResource {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// The create/edit form. It does not depend on panel settings.
    pub fn product_form() -> Form {
        Form::new(vec![
            Component::Wizard {
                steps: vec![
                    Step::new(
                        "Main data",
                        vec![
                            Field::text_input("name").required().unique(true),
                            Field::text_input("price").required().numeric(),
                        ],
                    ),
                    Step::new(
                        "Additional data",
                        vec![
                            Field::radio("status").options(ProductStatus::options()),
                            Field::select("category_id").relationship("category", "name"),
                        ],
                    ),
                ],
            },
            Field::rich_editor("description")
                .column_span_full()
                .required()
                .into(),
        ])
        .columns(2)
    }
}

fn display_price(product: &Product) -> FieldValue {
    FieldValue::Float(product.price as f64 / 100.0)
}

impl Resource for ProductResource {
    type Record = Product;

    fn label(&self) -> String {
        "Products".to_string()
    }

    fn navigation_icon(&self) -> &str {
        NAVIGATION_ICON
    }

    fn navigation_sort(&self) -> i32 {
        2
    }

    fn form(&self) -> Form {
        Self::product_form()
    }

    fn table(&self) -> Table<Product> {
        Table::new()
            .columns(vec![
                Column::text_input("name")
                    .rules([Rule::Required, Rule::MinLength(3)])
                    .searchable_with(true, true)
                    .sortable(),
                Column::text("price")
                    .sortable()
                    .searchable()
                    .money(&self.currency)
                    .state(display_price)
                    .alignment(Alignment::End),
                Column::select("status", ProductStatus::options()),
                Column::toggle("is_active").on_color("primary").off_color("danger"),
                Column::text("category.name").label("Category name"),
                Column::text("tags.name"),
                Column::text("created_at").date_time(),
            ])
            .filters(
                vec![
                    TableFilter::select("status").options(ProductStatus::options()),
                    TableFilter::select("category").relationship("category", "name"),
                    TableFilter::date("created_from", "created_at", DateOperator::OnOrAfter),
                    TableFilter::date("created_until", "created_at", DateOperator::OnOrBefore),
                    TableFilter::trashed(),
                ],
                FiltersLayout::AboveContent,
            )
            .filters_form_columns(4)
            .actions(vec![Action::edit(), Action::delete(), Action::restore()])
            .bulk_actions(vec![BulkActionGroup::new(vec![Action::delete_bulk()])])
            .default_sort("price", SortDirection::Desc)
            .empty_state_actions(vec![Action::create()])
    }

    fn relations(&self) -> Vec<RelationManager> {
        vec![RelationManager::new("tags", "name")]
    }

    fn pages(&self) -> Pages {
        Pages::new(vec![
            PageRoute::new("index", "/"),
            PageRoute::new("create", "/create"),
            PageRoute::new("edit", "/{record}/edit"),
        ])
    }
}

impl ValidatableEntity for ProductResource {
    fn validation_config(_operation: &str) -> EntityValidationConfig {
        Self::product_form().validation_config("product")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::table::{ColumnKind, RelatedRecords};
    use serde_json::json;

    #[test]
    fn test_navigation() {
        let resource = ProductResource::default();
        let nav = resource.navigation("/admin");
        assert_eq!(nav.label, "Products");
        assert_eq!(nav.icon, "heroicon-o-rectangle-stack");
        assert_eq!(nav.sort, 2);
        assert_eq!(nav.url, "/admin/products");
        assert_eq!(resource.slug(), "products");
    }

    #[test]
    fn test_form_layout() {
        let form = ProductResource::product_form();
        assert_eq!(form.columns, 2);
        let main: Vec<_> = form.step_fields(0).unwrap().iter().map(|f| f.name.clone()).collect();
        let extra: Vec<_> = form.step_fields(1).unwrap().iter().map(|f| f.name.clone()).collect();
        assert_eq!(main, vec!["name", "price"]);
        assert_eq!(extra, vec!["status", "category_id"]);
        assert_eq!(form.unique_fields(), vec![("name", true)]);
        assert!(form.field("description").unwrap().is_required());
    }

    #[test]
    fn test_form_rejects_missing_name_and_price() {
        let errors = ProductResource::validation_config("create")
            .validate_and_filter(json!({ "description": "x" }))
            .unwrap_err();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("price"));
        assert!(!errors.contains_key("description"));
    }

    #[test]
    fn test_form_rejects_non_numeric_price_and_unknown_status() {
        let errors = ProductResource::validation_config("create")
            .validate_and_filter(json!({
                "name": "Lamp",
                "price": "cheap",
                "status": "discontinued",
                "description": "x"
            }))
            .unwrap_err();
        assert_eq!(errors["price"], vec!["The price field must be a number."]);
        assert!(errors.contains_key("status"));
    }

    #[test]
    fn test_table_columns() {
        let table = ProductResource::default().table();
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["name", "price", "status", "is_active", "category.name", "tags.name", "created_at"]
        );
        assert_eq!(
            table.column("is_active").unwrap().kind,
            ColumnKind::Toggle {
                on_color: "primary".to_string(),
                off_color: "danger".to_string()
            }
        );
        assert_eq!(table.column("category.name").unwrap().label, "Category name");
        let filters: Vec<_> = table.filters.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            filters,
            vec!["status", "category", "created_from", "created_until", "trashed"]
        );
        assert_eq!(table.filters_form_columns, 4);
    }

    #[test]
    fn test_price_cell_uses_configured_currency() {
        let mut product = Product::new(crate::products::model::ProductInput {
            name: "Lamp".to_string(),
            price: 123_450,
            status: ProductStatus::InStock,
            category_id: None,
            description: "x".to_string(),
        });
        product.price = 250;
        let usd = ProductResource::default().table().render_row(&product, &RelatedRecords::new());
        assert_eq!(usd["price"].text, "$2.50");
        let eur = ProductResource::new("eur").table().render_row(&product, &RelatedRecords::new());
        assert_eq!(eur["price"].text, "€2.50");
    }
}
