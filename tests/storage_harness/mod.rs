//! Shared test harness for storage backend testing
//!
//! Provides `TestRecord` implementing `Entity + Data` with fields covering
//! the `FieldValue` variants a table reads, plus helpers for creating test
//! data.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;
#[macro_use]
pub mod pivot_service_tests;

use chrono::{DateTime, Utc};
use panel::core::entity::Data;
use panel::core::field::FieldValue;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TestRecord
// ---------------------------------------------------------------------------

/// A test record with a unique `sku` and a handful of typed fields.
#[derive(Clone, Debug, PartialEq)]
pub struct TestRecord {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

panel::impl_entity!(TestRecord, "test_record", "test_records");

impl Data for TestRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_fields() -> &'static [&'static str] {
        &["sku"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Uuid(self.id)),
            "name" => Some(FieldValue::String(self.name.clone())),
            "sku" => Some(FieldValue::String(self.sku.clone())),
            "stock" => Some(FieldValue::Integer(self.stock)),
            "active" => Some(FieldValue::Boolean(self.active)),
            "created_at" => Some(FieldValue::DateTime(self.created_at)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Create a `TestRecord` with a random ID, in stock and active.
pub fn create_test_record(name: &str, sku: &str) -> TestRecord {
    let now = Utc::now();
    TestRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        sku: sku.to_string(),
        stock: 10,
        active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Generate `n` records with distinct names and skus.
pub fn sample_batch(n: usize) -> Vec<TestRecord> {
    (0..n)
        .map(|i| {
            let mut record = create_test_record(&format!("Record_{}", i), &format!("SKU-{:03}", i));
            record.stock = i as i64;
            record.active = i % 2 == 0;
            record
        })
        .collect()
}

/// Assert that a list contains exactly `n` items.
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}
