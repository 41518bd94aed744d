//! Product domain
//!
//! Catalog listings, the fixtures the catalog starts with, and the in-memory
//! filtering applied to them.

mod entity;
mod fixtures;
mod query;

pub use entity::{NewProduct, Product, ProductKind, ProductPatch};
pub use fixtures::{mock_products, MOCK_PRODUCT_COUNT};
pub(crate) use fixtures::round_rating;
pub use query::{CatalogFacets, ProductQuery, SortOption};
