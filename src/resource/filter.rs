//! Table filters
//!
//! A filter owns a small form (a select or a date picker) and a predicate.
//! The predicate only runs when the user supplied a value: an empty filter
//! form never narrows the table. The trashed filter has no predicate; it
//! picks the [`TrashScope`] the rows are listed in.

use crate::core::error::PanelError;
use crate::core::link::Relationship;
use crate::core::service::TrashScope;
use crate::core::Data;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

/// Comparison applied by a date filter against the date part of a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOperator {
    /// `date(attribute) >= value`
    OnOrAfter,
    /// `date(attribute) <= value`
    OnOrBefore,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    /// Exact match on an attribute, from static options or a relationship
    Select {
        attribute: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        options: Option<IndexMap<String, String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        relationship: Option<Relationship>,
    },
    /// Date picker bound to a timestamp attribute
    Date {
        attribute: String,
        operator: DateOperator,
    },
    /// Soft-deleted rows: `with` adds them, `only` shows nothing else
    Trashed { options: IndexMap<String, String> },
}

#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FilterKind,
}

/// Where the filter form renders relative to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FiltersLayout {
    Dropdown,
    AboveContent,
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn label_for(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl TableFilter {
    /// Select filter on the attribute of the same name
    pub fn select(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label_for(name),
            kind: FilterKind::Select {
                attribute: name.to_string(),
                options: None,
                relationship: None,
            },
        }
    }

    /// Date filter with its own date picker named after the filter
    pub fn date(name: &str, attribute: &str, operator: DateOperator) -> Self {
        Self {
            name: name.to_string(),
            label: label_for(name),
            kind: FilterKind::Date {
                attribute: attribute.to_string(),
                operator,
            },
        }
    }

    pub fn trashed() -> Self {
        Self {
            name: "trashed".to_string(),
            label: "Deleted records".to_string(),
            kind: FilterKind::Trashed {
                options: [
                    ("with", "With deleted records"),
                    ("only", "Only deleted records"),
                ]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            },
        }
    }

    pub fn options<K: ToString, V: ToString>(mut self, items: impl IntoIterator<Item = (K, V)>) -> Self {
        if let FilterKind::Select { options, .. } = &mut self.kind {
            *options = Some(
                items
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
        }
        self
    }

    /// Bind to a to-one relationship; matches on `<relationship>_id`
    pub fn relationship(mut self, name: &str, title_attribute: &str) -> Self {
        if let FilterKind::Select {
            attribute,
            relationship,
            ..
        } = &mut self.kind
        {
            *attribute = format!("{}_id", name);
            *relationship = Some(Relationship::new(name, title_attribute));
        }
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Fill the options of a relationship-bound select
    pub fn set_relationship_options(&mut self, relationship_name: &str, items: IndexMap<String, String>) {
        if let FilterKind::Select {
            options,
            relationship: Some(rel),
            ..
        } = &mut self.kind
        {
            if rel.name == relationship_name {
                *options = Some(items);
            }
        }
    }

    /// Listing scope picked by a trashed filter. Other filters, and an
    /// empty value, keep the default scope.
    pub fn trash_scope(&self, value: Option<&str>) -> Result<TrashScope, PanelError> {
        let (FilterKind::Trashed { .. }, Some(value)) = (&self.kind, value) else {
            return Ok(TrashScope::default());
        };
        match value {
            "with" => Ok(TrashScope::WithTrashed),
            "only" => Ok(TrashScope::OnlyTrashed),
            _ => Err(PanelError::field(
                format!("filter.{}", self.name),
                format!("The selected {} is invalid.", self.name.replace('_', " ")),
            )),
        }
    }

    /// Narrow `records` by this filter. `None` is a no-op.
    pub fn apply<R: Data>(&self, records: Vec<R>, value: Option<&str>) -> Result<Vec<R>, PanelError> {
        let Some(value) = value else {
            return Ok(records);
        };

        match &self.kind {
            FilterKind::Select { attribute, .. } => Ok(records
                .into_iter()
                .filter(|record| {
                    record
                        .field_value(attribute)
                        .is_some_and(|v| !v.is_null() && v.to_text() == value)
                })
                .collect()),
            FilterKind::Date {
                attribute,
                operator,
            } => {
                let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
                    PanelError::field(
                        format!("filter.{}", self.name),
                        format!(
                            "The {} field must match the format Y-m-d.",
                            self.name.replace('_', " ")
                        ),
                    )
                })?;
                Ok(records
                    .into_iter()
                    .filter(|record| {
                        let Some(stamp) = record.field_value(attribute).and_then(|v| v.as_datetime())
                        else {
                            return false;
                        };
                        let day = stamp.date_naive();
                        match operator {
                            DateOperator::OnOrAfter => day >= date,
                            DateOperator::OnOrBefore => day <= date,
                        }
                    })
                    .collect())
            }
            // Applied when the rows are listed
            FilterKind::Trashed { .. } => self.trash_scope(Some(value)).map(|_| records),
        }
    }
}
