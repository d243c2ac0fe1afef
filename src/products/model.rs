//! Product, Category and Tag records

use crate::core::error::{FieldErrors, PanelError, ValidationError};
use crate::core::{Data, Entity, FieldValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

crate::impl_named_record!(Category, "category", "categories", ["name"]);
crate::impl_named_record!(Tag, "tag", "tags", ["name"]);

/// Stock status of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    #[serde(rename = "in stock")]
    InStock,
    #[serde(rename = "sold out")]
    SoldOut,
    #[serde(rename = "coming soon")]
    ComingSoon,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 3] = [
        ProductStatus::InStock,
        ProductStatus::SoldOut,
        ProductStatus::ComingSoon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::InStock => "in stock",
            ProductStatus::SoldOut => "sold out",
            ProductStatus::ComingSoon => "coming soon",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    /// value → label pairs; labels are the values themselves
    pub fn options() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|s| (s.as_str(), s.as_str())).collect()
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,

    pub name: String,

    /// Price in minor currency units (cents)
    pub price: u64,

    #[serde(default)]
    pub status: ProductStatus,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub category_id: Option<Uuid>,

    /// Rich text (HTML)
    pub description: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

crate::impl_entity!(Product, "product", "products");

impl Data for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_fields() -> &'static [&'static str] {
        &["name"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Uuid(self.id)),
            "name" => Some(FieldValue::String(self.name.clone())),
            "price" => Some(i64::try_from(self.price).map_or(FieldValue::Null, FieldValue::Integer)),
            "status" => Some(FieldValue::from(self.status.as_str())),
            "is_active" => Some(FieldValue::Boolean(self.is_active)),
            "category_id" => Some(self.category_id.map_or(FieldValue::Null, FieldValue::Uuid)),
            "description" => Some(FieldValue::String(self.description.clone())),
            "created_at" => Some(FieldValue::DateTime(self.created_at)),
            "updated_at" => Some(FieldValue::DateTime(self.updated_at)),
            _ => None,
        }
    }
}

/// Writable product attributes, read from a validated form payload
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub price: u64,
    pub status: ProductStatus,
    pub category_id: Option<Uuid>,
    pub description: String,
}

/// Largest storable price, in minor units
pub const MAX_PRICE: u64 = i64::MAX as u64;

/// Read a price in minor units from a form value.
///
/// Accepts JSON integers and numeric strings; the value must be a whole,
/// non-negative number no greater than [`MAX_PRICE`]. Integers are read
/// exactly, never through a float.
pub fn parse_price(value: &Value) -> Result<u64, String> {
    let price = match value {
        Value::Number(n) => match n.as_u64() {
            Some(price) => price,
            None => return Err(reject_price(n.as_f64())),
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<u64>() {
                Ok(price) => price,
                Err(_) if s.bytes().all(|b| b.is_ascii_digit()) && !s.is_empty() => {
                    return Err(too_large());
                }
                Err(_) => return Err(reject_price(s.parse::<f64>().ok())),
            }
        }
        _ => return Err("The price field must be a number.".to_string()),
    };

    if price > MAX_PRICE {
        return Err(too_large());
    }
    Ok(price)
}

fn too_large() -> String {
    format!("The price field must not be greater than {}.", MAX_PRICE)
}

/// Message for a numeric value that is not a non-negative integer
fn reject_price(number: Option<f64>) -> String {
    match number.filter(|n| n.is_finite()) {
        None => "The price field must be a number.".to_string(),
        Some(n) if n < 0.0 => "The price field must be at least 0.".to_string(),
        Some(n) if n.fract() == 0.0 => too_large(),
        Some(_) => "The price field must be a whole number of cents.".to_string(),
    }
}

fn string_field(payload: &Map<String, Value>, field: &str) -> String {
    payload
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl ProductInput {
    /// Convert a payload that already passed the form's rules
    pub fn from_payload(payload: &Value) -> Result<Self, PanelError> {
        let empty = Map::new();
        let payload = payload.as_object().unwrap_or(&empty);
        let mut errors = FieldErrors::new();

        let price = match parse_price(payload.get("price").unwrap_or(&Value::Null)) {
            Ok(price) => price,
            Err(message) => {
                errors.entry("price".to_string()).or_default().push(message);
                0
            }
        };

        let status = match payload.get("status") {
            None | Some(Value::Null) => ProductStatus::default(),
            Some(value) => match value.as_str().and_then(ProductStatus::parse) {
                Some(status) => status,
                None => {
                    errors
                        .entry("status".to_string())
                        .or_default()
                        .push("The selected status is invalid.".to_string());
                    ProductStatus::default()
                }
            },
        };

        let category_id = match payload.get("category_id") {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_str().map(Uuid::parse_str) {
                Some(Ok(id)) => Some(id),
                _ => {
                    errors
                        .entry("category_id".to_string())
                        .or_default()
                        .push("The selected category is invalid.".to_string());
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(PanelError::Validation(ValidationError::FieldErrors(errors)));
        }

        Ok(Self {
            name: string_field(payload, "name"),
            price,
            status,
            category_id,
            description: string_field(payload, "description"),
        })
    }
}

impl Product {
    pub fn new(input: ProductInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            price: input.price,
            status: input.status,
            is_active: true,
            category_id: input.category_id,
            description: input.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Overwrite the form attributes, keeping id, timestamps and the
    /// inline-only `is_active` flag
    pub fn apply_input(&mut self, input: ProductInput) {
        self.name = input.name;
        self.price = input.price;
        self.status = input.status;
        self.category_id = input.category_id;
        self.description = input.description;
        self.touch();
    }

    /// Set one attribute from an already validated inline cell edit
    pub fn apply_column(&mut self, column: &str, value: &Value) -> Result<(), PanelError> {
        match column {
            "name" => {
                self.name = value.as_str().unwrap_or_default().to_string();
            }
            "status" => {
                self.status = value
                    .as_str()
                    .and_then(ProductStatus::parse)
                    .ok_or_else(|| PanelError::field("status", "The selected status is invalid."))?;
            }
            "is_active" => {
                self.is_active = value
                    .as_bool()
                    .ok_or_else(|| PanelError::field("is_active", "The is active field must be true or false."))?;
            }
            other => {
                return Err(crate::core::error::RequestError::ColumnNotEditable {
                    column: other.to_string(),
                }
                .into());
            }
        }
        self.touch();
        Ok(())
    }

    /// Attributes as a JSON object, for filling the edit form
    pub fn attributes(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> ProductInput {
        ProductInput {
            name: "Desk Lamp".to_string(),
            price: 1999,
            status: ProductStatus::SoldOut,
            category_id: None,
            description: "<p>Bright</p>".to_string(),
        }
    }

    #[test]
    fn test_status_serializes_with_spaces() {
        assert_eq!(serde_json::to_value(ProductStatus::ComingSoon).unwrap(), json!("coming soon"));
        assert_eq!(ProductStatus::parse("sold out"), Some(ProductStatus::SoldOut));
        assert_eq!(ProductStatus::parse("discontinued"), None);
        assert_eq!(ProductStatus::default(), ProductStatus::InStock);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(&json!(1999)), Ok(1999));
        assert_eq!(parse_price(&json!("250")), Ok(250));
        assert_eq!(parse_price(&json!(" 10 ")), Ok(10));
        assert!(parse_price(&json!("ten")).is_err());
        assert!(parse_price(&json!(-5)).is_err());
        assert!(parse_price(&json!(12.5)).is_err());
        assert!(parse_price(&Value::Null).is_err());
    }

    #[test]
    fn test_parse_price_keeps_large_integers_exact() {
        assert_eq!(parse_price(&json!("9007199254740993")), Ok(9_007_199_254_740_993));
        assert_eq!(parse_price(&json!(9_007_199_254_740_993u64)), Ok(9_007_199_254_740_993));
        assert_eq!(parse_price(&json!(i64::MAX.to_string())), Ok(MAX_PRICE));
    }

    #[test]
    fn test_parse_price_rejects_values_above_max() {
        let message = format!("The price field must not be greater than {}.", MAX_PRICE);
        assert_eq!(parse_price(&json!("10000000000000000000")), Err(message.clone()));
        assert_eq!(parse_price(&json!(10_000_000_000_000_000_000u64)), Err(message.clone()));
        assert_eq!(parse_price(&json!("99999999999999999999999")), Err(message.clone()));
        assert_eq!(parse_price(&json!(1e30)), Err(message));
        assert_eq!(
            parse_price(&json!("-3")),
            Err("The price field must be at least 0.".to_string())
        );
        assert_eq!(
            parse_price(&json!("1.5")),
            Err("The price field must be a whole number of cents.".to_string())
        );
    }

    #[test]
    fn test_input_defaults_status() {
        let input = ProductInput::from_payload(&json!({
            "name": "Lamp",
            "price": "100",
            "description": "x",
            "status": null,
            "category_id": null
        }))
        .unwrap();
        assert_eq!(input.status, ProductStatus::InStock);
        assert_eq!(input.price, 100);
        assert_eq!(input.category_id, None);
    }

    #[test]
    fn test_input_collects_errors() {
        let err = ProductInput::from_payload(&json!({
            "name": "Lamp",
            "price": -1,
            "status": "discontinued",
            "description": "x"
        }))
        .unwrap_err();
        match err {
            PanelError::Validation(e) => {
                let keys: Vec<_> = e.fields().keys().cloned().collect();
                assert_eq!(keys, vec!["price", "status"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_product_defaults() {
        let product = Product::new(input());
        assert!(product.is_active);
        assert!(!product.is_deleted());
        assert_eq!(Product::unique_fields(), &["name"]);
        assert_eq!(product.field_value("price"), Some(FieldValue::Integer(1999)));
        assert_eq!(product.field_value("category_id"), Some(FieldValue::Null));
    }

    #[test]
    fn test_apply_input_keeps_identity_and_flag() {
        let mut product = Product::new(input());
        product.is_active = false;
        let id = product.id;

        let mut changed = input();
        changed.name = "Floor Lamp".to_string();
        product.apply_input(changed);

        assert_eq!(product.id, id);
        assert_eq!(product.name, "Floor Lamp");
        assert!(!product.is_active);
    }

    #[test]
    fn test_apply_column() {
        let mut product = Product::new(input());
        product.apply_column("status", &json!("coming soon")).unwrap();
        assert_eq!(product.status, ProductStatus::ComingSoon);
        product.apply_column("is_active", &json!(false)).unwrap();
        assert!(!product.is_active);
        assert!(product.apply_column("price", &json!(1)).is_err());
    }

    #[test]
    fn test_attributes_for_form_fill() {
        let product = Product::new(input());
        let attrs = product.attributes();
        assert_eq!(attrs["status"], json!("sold out"));
        assert_eq!(attrs["price"], json!(1999));
    }
}
