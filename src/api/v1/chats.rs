//! Chat board handlers

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json};
use crate::domain::{ChatBoardState, ChatMessage};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

/// GET /api/chats
pub async fn list_chats(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ChatBoardState>>, ApiError> {
    Ok(ApiResponse::ok(state.chat_service.list_chats().await?))
}

/// GET /api/chats/{chat_id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<ApiResponse<Vec<ChatMessage>>, ApiError> {
    Ok(ApiResponse::ok(state.chat_service.list_messages(&chat_id).await?))
}

/// POST /api/chats/{chat_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<ApiResponse<ChatMessage>, ApiError> {
    let message = state
        .chat_service
        .send_message(&chat_id, &request.user_id, &request.text)
        .await?;

    Ok(ApiResponse::ok(message))
}
