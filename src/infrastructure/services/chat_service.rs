//! Chat board service

use std::sync::Arc;

use tracing::debug;

use crate::domain::chat::{ChatBoardEntity, ChatBoardState, ChatMessage};
use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct ChatService {
    store: Arc<dyn KeyValueStore>,
    page_size: usize,
}

impl ChatService {
    pub fn new(store: Arc<dyn KeyValueStore>, page_size: usize) -> Self {
        Self { store, page_size }
    }

    pub async fn list_chats(&self) -> Result<Vec<ChatBoardState>, DomainError> {
        ChatBoardEntity::ensure_seed(&self.store).await?;
        ChatBoardEntity::list_all(&self.store, self.page_size).await
    }

    async fn existing_board(&self, chat_id: &str) -> Result<ChatBoardEntity, DomainError> {
        let board = ChatBoardEntity::new(Arc::clone(&self.store), chat_id);

        if !board.exists().await? {
            return Err(DomainError::not_found("Chat not found"));
        }

        Ok(board)
    }

    pub async fn list_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, DomainError> {
        self.existing_board(chat_id).await?.list_messages().await
    }

    /// Posts `text` as `user_id`; surrounding whitespace is trimmed before storing
    pub async fn send_message(
        &self,
        chat_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<ChatMessage, DomainError> {
        if user_id.trim().is_empty() || text.trim().is_empty() {
            return Err(DomainError::validation("userId and text are required"));
        }

        let board = self.existing_board(chat_id).await?;
        let message = board.send_message(user_id, text.trim()).await?;
        debug!(chat_id = %chat_id, message_id = %message.id, "Posted chat message");

        Ok(message)
    }
}
