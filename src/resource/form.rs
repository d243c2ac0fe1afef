//! Form schema builder for create and edit pages
//!
//! A [`Form`] is a tree of components (wizards and fields). The schema is
//! served as JSON for rendering and is also the single source of the write
//! validation rules.

use crate::core::link::Relationship;
use crate::core::validation::{EntityValidationConfig, filters, validators};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Input widget rendered for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    TextInput,
    Radio,
    Select,
    RichEditor,
}

/// A validation rule attached to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Numeric,
    MinLength(usize),
    /// Value must not exist on another row; `ignore_record` skips the row
    /// being edited
    Unique { ignore_record: bool },
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::Numeric => write!(f, "numeric"),
            Rule::MinLength(n) => write!(f, "min:{}", n),
            Rule::Unique { ignore_record } => {
                if *ignore_record {
                    write!(f, "unique:ignore_record")
                } else {
                    write!(f, "unique")
                }
            }
        }
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How many layout columns a component spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSpan {
    Default,
    Full,
}

/// A single input
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,
    pub column_span: ColumnSpan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

fn headline(name: &str) -> String {
    let spaced = name.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Field {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: headline(name),
            kind,
            rules: Vec::new(),
            options: None,
            relationship: None,
            column_span: ColumnSpan::Default,
            value: None,
        }
    }

    pub fn text_input(name: &str) -> Self {
        Self::new(name, FieldKind::TextInput)
    }

    pub fn radio(name: &str) -> Self {
        Self::new(name, FieldKind::Radio)
    }

    pub fn select(name: &str) -> Self {
        Self::new(name, FieldKind::Select)
    }

    pub fn rich_editor(name: &str) -> Self {
        Self::new(name, FieldKind::RichEditor)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    pub fn numeric(self) -> Self {
        self.rule(Rule::Numeric)
    }

    pub fn unique(self, ignore_record: bool) -> Self {
        self.rule(Rule::Unique { ignore_record })
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
        self
    }

    /// Static options, value → label
    pub fn options<K: ToString, V: ToString>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self {
        self.options = Some(
            options
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    /// Bind a select to a relationship; options are loaded per request
    pub fn relationship(mut self, name: &str, title_attribute: &str) -> Self {
        self.relationship = Some(Relationship::new(name, title_attribute));
        self
    }

    pub fn column_span_full(mut self) -> Self {
        self.column_span = ColumnSpan::Full;
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }

    /// `Some(ignore_record)` when the field carries a unique rule
    pub fn unique_rule(&self) -> Option<bool> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Unique { ignore_record } => Some(*ignore_record),
            _ => None,
        })
    }

    /// Register this field's filters and synchronous validators
    pub fn register(&self, config: &mut EntityValidationConfig) {
        let name = self.name.as_str();
        config.add_field(name);

        match self.kind {
            FieldKind::TextInput | FieldKind::RichEditor => {
                config.add_filter(name, filters::trim());
            }
            FieldKind::Select | FieldKind::Radio => {
                config.add_filter(name, filters::empty_string_to_null());
            }
        }

        for rule in &self.rules {
            match rule {
                Rule::Required => config.add_validator(name, validators::required()),
                Rule::Numeric => config.add_validator(name, validators::numeric()),
                Rule::MinLength(n) => config.add_validator(name, validators::min_length(*n)),
                // Needs the store; checked by the write handler
                Rule::Unique { .. } => {}
            }
        }

        if self.relationship.is_some() {
            config.add_validator(name, validators::uuid());
        } else if let Some(options) = &self.options {
            config.add_validator(name, validators::in_list(options.keys().cloned().collect()));
        }
    }
}

/// One step of a guided wizard
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub label: String,
    pub fields: Vec<Field>,
}

impl Step {
    pub fn new(label: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            label: label.into(),
            fields,
        }
    }
}

/// A component of a form
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Wizard { steps: Vec<Step> },
    Field(Field),
}

impl From<Field> for Component {
    fn from(field: Field) -> Self {
        Component::Field(field)
    }
}

/// A complete form schema
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    pub columns: u8,
    pub components: Vec<Component>,
}

impl Form {
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            columns: 1,
            components,
        }
    }

    pub fn columns(mut self, columns: u8) -> Self {
        self.columns = columns;
        self
    }

    /// Every field in declaration order, wizard steps flattened
    pub fn fields(&self) -> Vec<&Field> {
        let mut out = Vec::new();
        for component in &self.components {
            match component {
                Component::Wizard { steps } => {
                    out.extend(steps.iter().flat_map(|step| step.fields.iter()))
                }
                Component::Field(field) => out.push(field),
            }
        }
        out
    }

    fn fields_mut(&mut self) -> Vec<&mut Field> {
        let mut out = Vec::new();
        for component in &mut self.components {
            match component {
                Component::Wizard { steps } => {
                    out.extend(steps.iter_mut().flat_map(|step| step.fields.iter_mut()))
                }
                Component::Field(field) => out.push(field),
            }
        }
        out
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().into_iter().find(|f| f.name == name)
    }

    /// Fields of wizard step `step` (zero-based). `None` if there is no such step.
    pub fn step_fields(&self, step: usize) -> Option<Vec<&Field>> {
        self.components.iter().find_map(|component| match component {
            Component::Wizard { steps } => steps.get(step).map(|s| s.fields.iter().collect()),
            Component::Field(_) => None,
        })
    }

    /// Filters and synchronous validators for every field
    pub fn validation_config(&self, entity_type: &str) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(entity_type);
        for field in self.fields() {
            field.register(&mut config);
        }
        config
    }

    /// Fields whose rules need a store lookup
    pub fn unique_fields(&self) -> Vec<(&str, bool)> {
        self.fields()
            .into_iter()
            .filter_map(|f| f.unique_rule().map(|ignore| (f.name.as_str(), ignore)))
            .collect()
    }

    /// Fields bound to a relationship
    pub fn relationship_fields(&self) -> Vec<(&str, &Relationship)> {
        self.fields()
            .into_iter()
            .filter_map(|f| f.relationship.as_ref().map(|r| (f.name.as_str(), r)))
            .collect()
    }

    /// Fill the options of the field bound to `relationship`
    pub fn with_relationship_options(
        mut self,
        relationship: &str,
        options: IndexMap<String, String>,
    ) -> Self {
        for field in self.fields_mut() {
            if field
                .relationship
                .as_ref()
                .is_some_and(|r| r.name == relationship)
            {
                field.options = Some(options.clone());
            }
        }
        self
    }

    /// Set current values for an edit page; unknown keys are ignored
    pub fn fill(mut self, values: &Map<String, Value>) -> Self {
        for field in self.fields_mut() {
            if let Some(value) = values.get(&field.name) {
                field.value = Some(value.clone());
            }
        }
        self
    }
}
