//! Catalog handlers

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json};
use crate::domain::{CatalogFacets, NewProduct, Product, ProductPatch, ProductQuery, SortOption};

/// Query string of `GET /api/products`; list filters are comma separated
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductListParams {
    pub search: Option<String>,
    pub categories: Option<String>,
    pub brands: Option<String>,
    pub colors: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<String>,
}

impl ProductListParams {
    pub fn into_query(self) -> Result<ProductQuery, ApiError> {
        let sort = match self.sort.as_deref() {
            Some(raw) if !raw.is_empty() => raw.parse::<SortOption>()?,
            _ => SortOption::default(),
        };

        Ok(ProductQuery {
            search: self.search.unwrap_or_default(),
            categories: split_list(self.categories),
            brands: split_list(self.brands),
            colors: split_list(self.colors),
            min_price: self.min_price,
            max_price: self.max_price,
            sort,
        })
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct DeletedProduct {
    pub id: String,
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let query = params.into_query()?;
    debug!(?query, "Listing products");

    Ok(ApiResponse::ok(state.product_service.list(&query).await?))
}

/// GET /api/products/facets
pub async fn get_facets(
    State(state): State<AppState>,
) -> Result<ApiResponse<CatalogFacets>, ApiError> {
    Ok(ApiResponse::ok(state.product_service.facets().await?))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Product>, ApiError> {
    Ok(ApiResponse::ok(state.product_service.get(&id).await?))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<NewProduct>,
) -> Result<ApiResponse<Product>, ApiError> {
    Ok(ApiResponse::ok(state.product_service.create(request).await?))
}

/// PUT /api/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<ApiResponse<Product>, ApiError> {
    Ok(ApiResponse::ok(state.product_service.update(&id, patch).await?))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<DeletedProduct>, ApiError> {
    let id = state.product_service.delete(&id).await?;

    Ok(ApiResponse::ok(DeletedProduct { id }))
}
