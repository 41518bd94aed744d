//! Registration and login handlers

use axum::extract::State;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json};
use crate::domain::PublicUser;
use crate::infrastructure::services::LoginResult;

/// Body of both auth endpoints
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<ApiResponse<PublicUser>, ApiError> {
    debug!(user = %request.name, "Registering user");

    let user = state
        .auth_service
        .register(&request.name, &request.password)
        .await?;

    Ok(ApiResponse::ok(user))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<ApiResponse<LoginResult>, ApiError> {
    let result = state
        .auth_service
        .login(&request.name, &request.password)
        .await?;

    Ok(ApiResponse::ok(result))
}
