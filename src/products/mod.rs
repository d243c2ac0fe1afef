//! Product resource module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod resource;
pub mod store;

pub use descriptor::ProductDescriptor;
pub use handlers::ProductAppState;
pub use model::{Category, Product, ProductInput, ProductStatus, Tag};
pub use resource::ProductResource;
pub use store::ProductStores;
