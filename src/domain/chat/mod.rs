//! Chat domain
//!
//! A chat board embeds its messages; they are always read and written together
//! with the board.

mod entity;

pub use entity::{ChatBoardEntity, ChatBoardKind, ChatBoardState, ChatMessage};
