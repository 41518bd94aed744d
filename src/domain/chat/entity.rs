//! Chat board entity and messages

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{require_key_field, EntityKind, IndexedEntity, IndexedKind};
use crate::domain::DomainError;

/// A message posted on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub user_id: String,
    pub text: String,
    /// Epoch milliseconds
    pub ts: i64,
}

/// A board together with its messages, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBoardState {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

pub struct ChatBoardKind;

impl EntityKind for ChatBoardKind {
    type State = ChatBoardState;

    const ENTITY_NAME: &'static str = "chat";

    fn initial_state() -> ChatBoardState {
        ChatBoardState {
            id: String::new(),
            title: String::new(),
            messages: Vec::new(),
        }
    }

    fn key_of(state: &ChatBoardState) -> Result<String, DomainError> {
        require_key_field("chat", "id", &state.id)
    }
}

impl IndexedKind for ChatBoardKind {
    const INDEX_NAME: &'static str = "chats";

    fn seed_data() -> Vec<ChatBoardState> {
        vec![ChatBoardState {
            id: "c1".to_string(),
            title: "General".to_string(),
            messages: vec![ChatMessage {
                id: "m1".to_string(),
                chat_id: "c1".to_string(),
                user_id: "User A".to_string(),
                text: "Hello".to_string(),
                ts: Utc::now().timestamp_millis(),
            }],
        }]
    }
}

pub type ChatBoardEntity = IndexedEntity<ChatBoardKind>;

impl IndexedEntity<ChatBoardKind> {
    /// Appends a new message to the board and returns it
    pub async fn send_message(&self, user_id: &str, text: &str) -> Result<ChatMessage, DomainError> {
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            chat_id: self.id().to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            ts: Utc::now().timestamp_millis(),
        };

        let appended = message.clone();
        self.mutate(move |mut board| {
            board.messages.push(appended);
            board
        })
        .await?;

        Ok(message)
    }

    pub async fn list_messages(&self) -> Result<Vec<ChatMessage>, DomainError> {
        Ok(self.get_state().await?.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::KeyValueStore;
    use crate::infrastructure::storage::InMemoryKeyValueStore;
    use std::sync::Arc;

    fn board(id: &str) -> ChatBoardState {
        ChatBoardState {
            id: id.to_string(),
            title: "Deals".to_string(),
            messages: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_send_message_then_list() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let created_at = Utc::now().timestamp_millis();
        ChatBoardEntity::create(&store, board("c9")).await.unwrap();

        let chat = ChatBoardEntity::new(Arc::clone(&store), "c9");
        let sent = chat.send_message("alice", "hi").await.unwrap();
        let messages = chat.list_messages().await.unwrap();

        assert_eq!(messages, vec![sent.clone()]);
        assert_eq!(sent.user_id, "alice");
        assert_eq!(sent.text, "hi");
        assert_eq!(sent.chat_id, "c9");
        assert!(sent.ts >= created_at);
    }

    #[tokio::test]
    async fn test_messages_keep_order_and_board_fields() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        ChatBoardEntity::create(&store, board("c9")).await.unwrap();
        let chat = ChatBoardEntity::new(Arc::clone(&store), "c9");

        let first = chat.send_message("alice", "one").await.unwrap();
        let second = chat.send_message("bob", "two").await.unwrap();

        let state = chat.get_state().await.unwrap();
        assert_eq!(state.title, "Deals");
        assert_eq!(state.messages, vec![first.clone(), second.clone()]);
        assert_ne!(first.id, second.id);
        assert!(second.ts >= first.ts);
    }

    #[tokio::test]
    async fn test_list_messages_of_unknown_board_is_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());

        let messages = ChatBoardEntity::new(store, "nope").list_messages().await.unwrap();

        assert!(messages.is_empty());
    }

    #[test]
    fn test_seed_board_holds_its_message() {
        let seeds = ChatBoardKind::seed_data();

        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].messages.len(), 1);
        assert_eq!(seeds[0].messages[0].chat_id, seeds[0].id);
    }

    #[test]
    fn test_message_wire_format() {
        let message = ChatMessage {
            id: "m1".to_string(),
            chat_id: "c1".to_string(),
            user_id: "u".to_string(),
            text: "t".to_string(),
            ts: 1,
        };

        let value = serde_json::to_value(message).unwrap();
        assert_eq!(value["chatId"], "c1");
        assert_eq!(value["userId"], "u");
    }
}
