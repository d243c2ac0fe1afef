//! Table query parameters and pagination utilities

use crate::config::PaginationConfig;
use serde::Serialize;
use std::collections::HashMap;

/// Sort direction for a sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// A column plus a direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub column: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Parse `column` or `column:asc|desc`. An unknown direction yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (column, direction) = match raw.split_once(':') {
            Some((column, direction)) => (column, SortDirection::parse(direction)?),
            None => (raw, SortDirection::Asc),
        };
        let column = column.trim();
        if column.is_empty() {
            return None;
        }
        Some(Self::new(column, direction))
    }
}

/// Query parameters for a table page
///
/// Extracted from the raw query string so that dotted keys can carry
/// per-column search terms and filter values.
///
/// # Example
/// ```text
/// GET /admin/products?page=2&per_page=25
/// GET /admin/products?search=widget&search.name=blue
/// GET /admin/products?filter.status=sold%20out&filter.created_from=2024-01-01
/// GET /admin/products?sort=name:asc
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of rows per page, `None` for the configured default
    pub per_page: Option<usize>,

    /// Global search term
    pub search: Option<String>,

    /// Per-column search terms (`search.<column>`)
    pub column_search: HashMap<String, String>,

    /// Filter form state (`filter.<name>`)
    pub filters: HashMap<String, String>,

    /// Raw user sort, validated against the table later
    pub sort: Option<String>,
}

impl TableQuery {
    /// Build from raw query-string pairs. Blank values are dropped.
    pub fn from_pairs(pairs: HashMap<String, String>) -> Self {
        let mut query = TableQuery {
            page: 1,
            ..Default::default()
        };

        for (key, value) in pairs {
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "page" => query.page = value.parse().unwrap_or(1),
                "per_page" => query.per_page = value.parse().ok(),
                "search" => query.search = Some(value),
                "sort" => query.sort = Some(value),
                _ => {
                    if let Some(column) = key.strip_prefix("search.") {
                        query.column_search.insert(column.to_string(), value);
                    } else if let Some(filter) = key.strip_prefix("filter.") {
                        query.filters.insert(filter.to_string(), value);
                    }
                }
            }
        }

        query
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Rows per page, falling back to the configured default when the
    /// requested size is not one of the allowed options
    pub fn per_page(&self, config: &PaginationConfig) -> usize {
        match self.per_page {
            Some(n) if config.per_page_options.contains(&n) => n,
            _ => config.default_per_page,
        }
    }

    /// Value of a filter, if the user supplied one
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }
}

/// Paginated response structure
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub per_page: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        // Ensure per_page is at least 1 to avoid division by zero
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(per_page) };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Index of the first item on this page, saturating for pages far past the end
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Slice one page out of an already ordered collection
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> PaginatedResponse<T> {
    let meta = PaginationMeta::new(page, per_page, items.len());
    let data = items
        .into_iter()
        .skip(meta.offset())
        .take(meta.per_page)
        .collect();

    PaginatedResponse {
        data,
        pagination: meta,
    }
}
