//! Storage implementations for records and pivots

pub mod in_memory;

pub use in_memory::{InMemoryDataService, InMemoryPivotService};
