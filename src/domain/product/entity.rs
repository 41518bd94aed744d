//! Product entity and related types

use serde::{Deserialize, Serialize};

use crate::domain::entity::{require_key_field, EntityKind, IndexedKind};
use crate::domain::DomainError;

use super::fixtures::mock_products;

/// A catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub original_price: f64,
    pub category: String,
    pub brand: String,
    /// Hex color codes
    pub colors: Vec<String>,
    pub rating: f64,
    pub reviews: u32,
    /// Name of the user who submitted the listing
    pub submitted_by: String,
}

/// Fields a user provides when submitting a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub original_price: f64,
    pub category: String,
    pub brand: String,
    pub submitted_by: String,
}

/// Partial update of a listing; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub colors: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub submitted_by: Option<String>,
}

impl ProductPatch {
    /// Shallow merge over `product`; the id never changes
    pub fn apply(self, mut product: Product) -> Product {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(original_price) = self.original_price {
            product.original_price = original_price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(brand) = self.brand {
            product.brand = brand;
        }
        if let Some(colors) = self.colors {
            product.colors = colors;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(reviews) = self.reviews {
            product.reviews = reviews;
        }
        if let Some(submitted_by) = self.submitted_by {
            product.submitted_by = submitted_by;
        }

        product
    }
}

/// Products are keyed by their generated id
pub struct ProductKind;

impl EntityKind for ProductKind {
    type State = Product;

    const ENTITY_NAME: &'static str = "product";

    fn initial_state() -> Product {
        Product {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            image: String::new(),
            price: 0.0,
            original_price: 0.0,
            category: String::new(),
            brand: String::new(),
            colors: Vec::new(),
            rating: 0.0,
            reviews: 0,
            submitted_by: String::new(),
        }
    }

    fn key_of(state: &Product) -> Result<String, DomainError> {
        require_key_field("product", "id", &state.id)
    }
}

impl IndexedKind for ProductKind {
    const INDEX_NAME: &'static str = "products";

    fn seed_data() -> Vec<Product> {
        mock_products()
    }
}
