//! Table schema builder for index pages
//!
//! A [`Table`] declares columns, filters and actions for one record type
//! and knows how to turn a set of records into the visible page: filters
//! first, then search, then ordering.

use crate::core::error::{FieldErrors, PanelError, RequestError, ValidationError};
use crate::core::query::{Sort, SortDirection, TableQuery};
use crate::core::validation::{EntityValidationConfig, filters, validators};
use crate::core::service::TrashScope;
use crate::core::{Data, FieldValue};
use crate::resource::filter::{FilterKind, FiltersLayout, TableFilter};
use crate::resource::form::Rule;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::marker::PhantomData;

/// Attributes of a related record, by name
pub type Attributes = HashMap<String, FieldValue>;

/// Records reachable from one row through a relationship
#[derive(Debug, Clone)]
pub enum Related {
    /// to-one (e.g. `category`); `None` when the foreign key is empty
    One(Option<Attributes>),
    /// to-many (e.g. `tags`)
    Many(Vec<Attributes>),
}

/// Relationship name → related records for one row
pub type RelatedRecords = HashMap<String, Related>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Read-only text
    Text,
    /// Inline-editable text input
    TextInput { rules: Vec<Rule> },
    /// Inline-editable select
    Select { options: IndexMap<String, String> },
    /// Inline-editable boolean switch
    Toggle { on_color: String, off_color: String },
}

impl ColumnKind {
    pub fn is_editable(&self) -> bool {
        !matches!(self, ColumnKind::Text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnFormat {
    #[default]
    Plain,
    Money { currency: String },
    DateTime,
}

pub const DATE_TIME_DISPLAY: &str = "%b %-d, %Y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Searchable {
    /// Own search box above the column
    pub individual: bool,
    /// Included in the table-wide search box
    pub global: bool,
}

/// Where a column's state comes from
pub enum ColumnSource<R> {
    /// The record attribute named like the column
    Attribute,
    /// `relation.attribute` dot notation
    Relation { relation: String, attribute: String },
    /// Derived from the record
    Computed(fn(&R) -> FieldValue),
}

impl<R> Clone for ColumnSource<R> {
    fn clone(&self) -> Self {
        match self {
            ColumnSource::Attribute => ColumnSource::Attribute,
            ColumnSource::Relation {
                relation,
                attribute,
            } => ColumnSource::Relation {
                relation: relation.clone(),
                attribute: attribute.clone(),
            },
            ColumnSource::Computed(f) => ColumnSource::Computed(*f),
        }
    }
}

/// State and display text of one cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub state: FieldValue,
    pub text: String,
}

pub struct Column<R> {
    pub name: String,
    pub label: String,
    pub kind: ColumnKind,
    pub source: ColumnSource<R>,
    pub searchable: Searchable,
    pub sortable: bool,
    pub alignment: Alignment,
    pub format: ColumnFormat,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            label: self.label.clone(),
            kind: self.kind.clone(),
            source: self.source.clone(),
            searchable: self.searchable,
            sortable: self.sortable,
            alignment: self.alignment,
            format: self.format.clone(),
        }
    }
}

fn column_label(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    let spaced = last.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<R: Data> Column<R> {
    fn new(name: &str, kind: ColumnKind) -> Self {
        let source = match name.split_once('.') {
            Some((relation, attribute)) => ColumnSource::Relation {
                relation: relation.to_string(),
                attribute: attribute.to_string(),
            },
            None => ColumnSource::Attribute,
        };
        Self {
            name: name.to_string(),
            label: column_label(name),
            kind,
            source,
            searchable: Searchable::default(),
            sortable: false,
            alignment: Alignment::Start,
            format: ColumnFormat::Plain,
        }
    }

    /// Read-only column; dot notation reads through a relationship
    pub fn text(name: &str) -> Self {
        Self::new(name, ColumnKind::Text)
    }

    pub fn text_input(name: &str) -> Self {
        Self::new(name, ColumnKind::TextInput { rules: Vec::new() })
    }

    pub fn select<K: ToString, V: ToString>(name: &str, options: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::new(
            name,
            ColumnKind::Select {
                options: options
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        )
    }

    pub fn toggle(name: &str) -> Self {
        Self::new(
            name,
            ColumnKind::Toggle {
                on_color: "primary".to_string(),
                off_color: "gray".to_string(),
            },
        )
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add validation rules to an inline text input
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        if let ColumnKind::TextInput { rules: own } = &mut self.kind {
            own.extend(rules);
        }
        self
    }

    pub fn on_color(mut self, color: &str) -> Self {
        if let ColumnKind::Toggle { on_color, .. } = &mut self.kind {
            *on_color = color.to_string();
        }
        self
    }

    pub fn off_color(mut self, color: &str) -> Self {
        if let ColumnKind::Toggle { off_color, .. } = &mut self.kind {
            *off_color = color.to_string();
        }
        self
    }

    /// Include in the table-wide search
    pub fn searchable(self) -> Self {
        self.searchable_with(false, true)
    }

    pub fn searchable_with(mut self, individual: bool, global: bool) -> Self {
        self.searchable = Searchable { individual, global };
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn money(mut self, currency: &str) -> Self {
        self.format = ColumnFormat::Money {
            currency: currency.to_string(),
        };
        self
    }

    pub fn date_time(mut self) -> Self {
        self.format = ColumnFormat::DateTime;
        self
    }

    /// Display a derived state instead of the stored attribute.
    /// Search and sort still use the stored attribute.
    pub fn state(mut self, compute: fn(&R) -> FieldValue) -> Self {
        self.source = ColumnSource::Computed(compute);
        self
    }

    /// The stored value used for search and ordering
    pub fn raw_value(&self, record: &R) -> FieldValue {
        record.field_value(&self.name).unwrap_or(FieldValue::Null)
    }

    /// The value shown in the cell
    pub fn cell_state(&self, record: &R, related: &RelatedRecords) -> FieldValue {
        match &self.source {
            ColumnSource::Attribute => self.raw_value(record),
            ColumnSource::Computed(compute) => compute(record),
            ColumnSource::Relation {
                relation,
                attribute,
            } => match related.get(relation) {
                Some(Related::One(Some(attrs))) => {
                    attrs.get(attribute).cloned().unwrap_or(FieldValue::Null)
                }
                Some(Related::Many(rows)) => FieldValue::List(
                    rows.iter()
                        .filter_map(|attrs| attrs.get(attribute).cloned())
                        .collect(),
                ),
                Some(Related::One(None)) | None => FieldValue::Null,
            },
        }
    }

    pub fn cell(&self, record: &R, related: &RelatedRecords) -> Cell {
        let state = self.cell_state(record, related);
        let text = self.display(record, &state);
        Cell { state, text }
    }

    fn display(&self, record: &R, state: &FieldValue) -> String {
        if state.is_null() {
            return String::new();
        }
        match &self.format {
            // Stored integer minor units are formatted as-is; the state is
            // only consulted when the attribute is not an integer.
            ColumnFormat::Money { currency } => match (self.raw_value(record), state.as_float()) {
                (FieldValue::Integer(minor), _) => format_money(minor, currency),
                (_, Some(amount)) => format_money((amount * 100.0).round() as i64, currency),
                (_, None) => state.to_text(),
            },
            ColumnFormat::DateTime => match state.as_datetime() {
                Some(dt) => dt.format(DATE_TIME_DISPLAY).to_string(),
                None => state.to_text(),
            },
            ColumnFormat::Plain => match &self.kind {
                ColumnKind::Select { options } => {
                    let key = state.to_text();
                    options.get(&key).cloned().unwrap_or(key)
                }
                _ => state.to_text(),
            },
        }
    }

    /// Validate a new cell state for an inline edit.
    ///
    /// Returns the filtered value; rejected values come back as field
    /// errors keyed by the column name.
    pub fn validate_state(&self, value: Value) -> Result<Value, PanelError> {
        let name = self.name.as_str();
        let mut config = EntityValidationConfig::new(name);
        match &self.kind {
            ColumnKind::Text => {
                return Err(RequestError::ColumnNotEditable {
                    column: self.name.clone(),
                }
                .into());
            }
            ColumnKind::TextInput { rules } => {
                config.add_filter(name, filters::trim());
                for rule in rules {
                    match rule {
                        Rule::Required => config.add_validator(name, validators::required()),
                        Rule::Numeric => config.add_validator(name, validators::numeric()),
                        Rule::MinLength(n) => config.add_validator(name, validators::min_length(*n)),
                        Rule::Unique { .. } => {}
                    }
                }
            }
            ColumnKind::Select { options } => {
                config.add_validator(name, validators::required());
                config.add_validator(name, validators::in_list(options.keys().cloned().collect()));
            }
            ColumnKind::Toggle { .. } => {
                config.add_validator(name, validators::required());
                config.add_validator(name, validators::boolean());
            }
        }

        let mut payload = serde_json::Map::new();
        payload.insert(name.to_string(), value);
        let mut validated = config
            .validate_and_filter(Value::Object(payload))
            .map_err(|errors| PanelError::Validation(ValidationError::FieldErrors(errors)))?;
        Ok(validated
            .get_mut(name)
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

/// Format an amount in minor units, e.g. `123450` usd → `$1,234.50`
pub fn format_money(minor: i64, currency: &str) -> String {
    let symbol = match currency.to_ascii_lowercase().as_str() {
        "usd" => "$".to_string(),
        "eur" => "€".to_string(),
        "gbp" => "£".to_string(),
        other => format!("{} ", other.to_ascii_uppercase()),
    };
    let sign = if minor < 0 { "-" } else { "" };
    let minor = minor.unsigned_abs();
    let whole = (minor / 100).to_string();
    let cents = minor % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}.{:02}", sign, symbol, grouped, cents)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Edit,
    Delete,
    Restore,
}

/// A button on a row, in the header, or in the bulk menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub name: String,
    pub label: String,
    pub kind: ActionKind,
    pub requires_confirmation: bool,
}

impl Action {
    pub fn create() -> Self {
        Self {
            name: "create".to_string(),
            label: "New".to_string(),
            kind: ActionKind::Create,
            requires_confirmation: false,
        }
    }

    pub fn edit() -> Self {
        Self {
            name: "edit".to_string(),
            label: "Edit".to_string(),
            kind: ActionKind::Edit,
            requires_confirmation: false,
        }
    }

    pub fn delete() -> Self {
        Self {
            name: "delete".to_string(),
            label: "Delete".to_string(),
            kind: ActionKind::Delete,
            requires_confirmation: true,
        }
    }

    /// Offered on soft-deleted rows only
    pub fn restore() -> Self {
        Self {
            name: "restore".to_string(),
            label: "Restore".to_string(),
            kind: ActionKind::Restore,
            requires_confirmation: true,
        }
    }

    /// Delete applied to the selected rows
    pub fn delete_bulk() -> Self {
        Self {
            label: "Delete selected".to_string(),
            ..Self::delete()
        }
    }
}

/// A dropdown of bulk actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkActionGroup {
    pub actions: Vec<Action>,
}

impl BulkActionGroup {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn find(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }
}

/// Complete table declaration for one record type
pub struct Table<R> {
    pub columns: Vec<Column<R>>,
    pub filters: Vec<TableFilter>,
    pub filters_layout: FiltersLayout,
    pub filters_form_columns: u8,
    pub actions: Vec<Action>,
    pub bulk_actions: Vec<BulkActionGroup>,
    pub default_sort: Option<Sort>,
    pub empty_state_actions: Vec<Action>,
    _record: PhantomData<fn(&R)>,
}

impl<R: Data> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Data> Table<R> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            filters: Vec::new(),
            filters_layout: FiltersLayout::Dropdown,
            filters_form_columns: 1,
            actions: Vec::new(),
            bulk_actions: Vec::new(),
            default_sort: None,
            empty_state_actions: Vec::new(),
            _record: PhantomData,
        }
    }

    pub fn columns(mut self, columns: Vec<Column<R>>) -> Self {
        self.columns = columns;
        self
    }

    pub fn filters(mut self, filters: Vec<TableFilter>, layout: FiltersLayout) -> Self {
        self.filters = filters;
        self.filters_layout = layout;
        self
    }

    pub fn filters_form_columns(mut self, columns: u8) -> Self {
        self.filters_form_columns = columns;
        self
    }

    pub fn actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn bulk_actions(mut self, groups: Vec<BulkActionGroup>) -> Self {
        self.bulk_actions = groups;
        self
    }

    pub fn default_sort(mut self, column: &str, direction: SortDirection) -> Self {
        self.default_sort = Some(Sort::new(column, direction));
        self
    }

    pub fn empty_state_actions(mut self, actions: Vec<Action>) -> Self {
        self.empty_state_actions = actions;
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column that accepts inline edits
    pub fn editable_column(&self, name: &str) -> Result<&Column<R>, PanelError> {
        let column = self.column(name).ok_or_else(|| RequestError::UnknownColumn {
            column: name.to_string(),
        })?;
        if !column.kind.is_editable() {
            return Err(RequestError::ColumnNotEditable {
                column: name.to_string(),
            }
            .into());
        }
        Ok(column)
    }

    /// Whether a bulk action with this name is offered
    pub fn has_bulk_action(&self, name: &str) -> bool {
        self.bulk_actions.iter().any(|group| group.find(name).is_some())
    }

    /// Row actions that apply to `record`: restore for a trashed row,
    /// everything else for a live one
    pub fn record_actions(&self, record: &R) -> Vec<&Action> {
        let trashed = record.is_deleted();
        self.actions
            .iter()
            .filter(|action| (action.kind == ActionKind::Restore) == trashed)
            .collect()
    }

    /// Listing scope requested through the trashed filter, if the table has one
    pub fn trash_scope(&self, query: &TableQuery) -> Result<TrashScope, PanelError> {
        match self
            .filters
            .iter()
            .find(|filter| matches!(filter.kind, FilterKind::Trashed { .. }))
        {
            Some(filter) => filter.trash_scope(query.filter(&filter.name)),
            None => Ok(TrashScope::default()),
        }
    }

    /// Fill relationship-bound filter options
    pub fn with_relationship_options(mut self, relationship: &str, options: IndexMap<String, String>) -> Self {
        for filter in &mut self.filters {
            filter.set_relationship_options(relationship, options.clone());
        }
        self
    }

    /// Cells for every column, keyed by column name
    pub fn render_row(&self, record: &R, related: &RelatedRecords) -> IndexMap<String, Cell> {
        self.columns
            .iter()
            .map(|column| (column.name.clone(), column.cell(record, related)))
            .collect()
    }

    /// Filter, search and order `records` for display
    pub fn apply(&self, records: Vec<R>, query: &TableQuery) -> Result<Vec<R>, PanelError> {
        let mut records = records;

        let mut filter_errors = FieldErrors::new();
        for filter in &self.filters {
            match filter.apply(std::mem::take(&mut records), query.filter(&filter.name)) {
                Ok(narrowed) => records = narrowed,
                Err(PanelError::Validation(ValidationError::FieldErrors(errors))) => {
                    filter_errors.extend(errors)
                }
                Err(other) => return Err(other),
            }
        }
        if !filter_errors.is_empty() {
            return Err(PanelError::Validation(ValidationError::FieldErrors(filter_errors)));
        }

        if let Some(term) = &query.search {
            let searchable: Vec<&Column<R>> =
                self.columns.iter().filter(|c| c.searchable.global).collect();
            records.retain(|record| {
                searchable
                    .iter()
                    .any(|column| column.raw_value(record).matches_search(term))
            });
        }

        let mut column_search: Vec<(&String, &String)> = query.column_search.iter().collect();
        column_search.sort();
        for (name, term) in column_search {
            let column = self.column(name).ok_or_else(|| RequestError::UnknownColumn {
                column: name.clone(),
            })?;
            if !column.searchable.individual {
                return Err(RequestError::ColumnNotSearchable {
                    column: name.clone(),
                }
                .into());
            }
            records.retain(|record| column.raw_value(record).matches_search(term));
        }

        let sort = match &query.sort {
            Some(raw) => {
                let sort = Sort::parse(raw).ok_or_else(|| RequestError::BadRequest {
                    message: format!("invalid sort '{}', expected <column>:<asc|desc>", raw),
                })?;
                let column = self.column(&sort.column).ok_or_else(|| RequestError::UnknownColumn {
                    column: sort.column.clone(),
                })?;
                if !column.sortable {
                    return Err(RequestError::ColumnNotSortable {
                        column: sort.column.clone(),
                    }
                    .into());
                }
                Some(sort)
            }
            None => self.default_sort.clone(),
        };

        if let Some(sort) = sort {
            let column_name = sort.column.as_str();
            records.sort_by(|a, b| {
                let left = a.field_value(column_name).unwrap_or(FieldValue::Null);
                let right = b.field_value(column_name).unwrap_or(FieldValue::Null);
                match sort.direction {
                    SortDirection::Asc => left.compare(&right),
                    SortDirection::Desc => right.compare(&left),
                }
            });
        }

        Ok(records)
    }

    /// Serializable description of the table for the front-end
    pub fn schema(&self) -> Value {
        let columns: Vec<Value> = self
            .columns
            .iter()
            .map(|column| {
                let relationship = match &column.source {
                    ColumnSource::Relation {
                        relation,
                        attribute,
                    } => json!({ "name": relation, "attribute": attribute }),
                    _ => Value::Null,
                };
                json!({
                    "name": column.name,
                    "label": column.label,
                    "kind": column.kind,
                    "relationship": relationship,
                    "searchable": column.searchable,
                    "sortable": column.sortable,
                    "alignment": column.alignment,
                    "format": column.format,
                })
            })
            .collect();

        json!({
            "columns": columns,
            "filters": self.filters,
            "filters_layout": self.filters_layout,
            "filters_form_columns": self.filters_form_columns,
            "actions": self.actions,
            "bulk_actions": self.bulk_actions,
            "default_sort": self.default_sort,
            "empty_state_actions": self.empty_state_actions,
        })
    }
}
