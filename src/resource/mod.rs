//! Declarative admin resources
//!
//! A resource answers a handful of questions about one record type (how
//! its forms look, which columns its table shows, which pages exist) and
//! leaves request handling to the server layer.

pub mod filter;
pub mod form;
pub mod page;
pub mod table;

pub use filter::{DateOperator, FiltersLayout, TableFilter};
pub use form::{Component, Field, Form, Rule, Step};
pub use page::{NavigationItem, PageRoute, Pages, RelationManager};
pub use table::{
    Action, Alignment, BulkActionGroup, Cell, Column, Related, RelatedRecords, Table,
    format_money,
};

use crate::core::Data;

/// Schema of an admin resource for one record type
pub trait Resource: Send + Sync + 'static {
    /// The record type listed and edited by this resource
    type Record: Data;

    /// URL segment under the panel path (e.g. "products")
    fn slug(&self) -> &str {
        <Self::Record as crate::core::Entity>::resource_name()
    }

    /// Plural label used in navigation and page titles
    fn label(&self) -> String;

    fn navigation_icon(&self) -> &str;

    /// Position in the navigation menu, lowest first
    fn navigation_sort(&self) -> i32 {
        0
    }

    fn form(&self) -> Form;

    fn table(&self) -> Table<Self::Record>;

    fn relations(&self) -> Vec<RelationManager> {
        Vec::new()
    }

    fn pages(&self) -> Pages;

    /// Navigation entry pointing at the index page under `panel_path`
    fn navigation(&self, panel_path: &str) -> NavigationItem {
        let base = format!("{}/{}", panel_path.trim_end_matches('/'), self.slug());
        NavigationItem {
            label: self.label(),
            icon: self.navigation_icon().to_string(),
            sort: self.navigation_sort(),
            url: self.pages().url(&base, "index", None).unwrap_or(base),
        }
    }
}
