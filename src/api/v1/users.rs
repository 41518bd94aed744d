//! User listing handlers

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse};
use crate::domain::{Product, PublicUser};

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PublicUser>>, ApiError> {
    Ok(ApiResponse::ok(state.auth_service.list_users().await?))
}

/// GET /api/users/{user_id}/products
pub async fn list_user_products(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let products = state.product_service.list_by_submitter(&user_id).await?;

    Ok(ApiResponse::ok(products))
}
