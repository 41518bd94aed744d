//! Catalog service

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::domain::entity::IndexedEntity;
use crate::domain::product::{
    round_rating, CatalogFacets, NewProduct, Product, ProductKind, ProductPatch, ProductQuery,
};
use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

type ProductEntity = IndexedEntity<ProductKind>;

const DEFAULT_COLORS: [&str; 2] = ["#252525", "#f5f5f5"];

/// Catalog listing, submission and maintenance
#[derive(Debug, Clone)]
pub struct ProductService {
    store: Arc<dyn KeyValueStore>,
    page_size: usize,
}

impl ProductService {
    pub fn new(store: Arc<dyn KeyValueStore>, page_size: usize) -> Self {
        Self { store, page_size }
    }

    async fn catalog(&self) -> Result<Vec<Product>, DomainError> {
        ProductEntity::ensure_seed(&self.store).await?;
        ProductEntity::list_all(&self.store, self.page_size).await
    }

    /// Filtered and sorted catalog
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, DomainError> {
        Ok(query.apply(self.catalog().await?))
    }

    pub async fn facets(&self) -> Result<CatalogFacets, DomainError> {
        Ok(CatalogFacets::from_products(&self.catalog().await?))
    }

    pub async fn get(&self, id: &str) -> Result<Product, DomainError> {
        let entity = ProductEntity::new(Arc::clone(&self.store), id);

        entity
            .load()
            .await?
            .ok_or_else(|| DomainError::not_found("Product not found"))
    }

    /// Lists a new product on behalf of `submittedBy`
    pub async fn create(&self, input: NewProduct) -> Result<Product, DomainError> {
        if input.submitted_by.trim().is_empty() {
            return Err(DomainError::validation("User ID (submittedBy) is required."));
        }
        if input.price < 0.0 || input.original_price < 0.0 {
            return Err(DomainError::validation("Prices must not be negative."));
        }

        let id = self.next_product_id().await?;
        let (rating, reviews) = {
            let mut rng = rand::thread_rng();
            (round_rating(rng.gen_range(3.5..=5.0)), rng.gen_range(0..50))
        };

        let product = Product {
            id,
            name: input.name,
            description: input.description,
            image: input.image,
            price: input.price,
            original_price: input.original_price,
            category: input.category,
            brand: input.brand,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            rating,
            reviews,
            submitted_by: input.submitted_by,
        };

        let product = ProductEntity::create(&self.store, product).await?;
        info!(product_id = %product.id, submitted_by = %product.submitted_by, "Created product");

        Ok(product)
    }

    /// `prod_<millis>`, moved forward while the id is taken
    async fn next_product_id(&self) -> Result<String, DomainError> {
        let mut millis = Utc::now().timestamp_millis();

        loop {
            let id = format!("prod_{}", millis);
            if !ProductEntity::new(Arc::clone(&self.store), id.as_str())
                .exists()
                .await?
            {
                return Ok(id);
            }
            millis += 1;
        }
    }

    pub async fn update(&self, id: &str, patch: ProductPatch) -> Result<Product, DomainError> {
        let entity = ProductEntity::new(Arc::clone(&self.store), id);

        if !entity.exists().await? {
            return Err(DomainError::not_found("Product not found"));
        }

        entity.mutate(move |current| patch.apply(current)).await
    }

    /// Deletes the listing and returns its id
    pub async fn delete(&self, id: &str) -> Result<String, DomainError> {
        if !ProductEntity::delete(&self.store, id).await? {
            return Err(DomainError::not_found("Product not found"));
        }

        info!(product_id = %id, "Deleted product");
        Ok(id.to_string())
    }

    /// Listings submitted by `user_id`, in listing order
    pub async fn list_by_submitter(&self, user_id: &str) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .catalog()
            .await?
            .into_iter()
            .filter(|p| p.submitted_by == user_id)
            .collect())
    }
}
