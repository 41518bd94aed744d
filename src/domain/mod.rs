//! Domain layer - Records, the entity/index storage layer, and catalog logic

pub mod chat;
pub mod entity;
pub mod error;
pub mod product;
pub mod storage;
pub mod user;

pub use chat::{ChatBoardEntity, ChatBoardKind, ChatBoardState, ChatMessage};
pub use entity::{Entity, EntityKind, Index, IndexPage, IndexedEntity, IndexedKind, Page};
pub use error::DomainError;
pub use product::{
    CatalogFacets, NewProduct, Product, ProductKind, ProductPatch, ProductQuery, SortOption,
};
pub use storage::{KeyValueStore, StoredEntry};
pub use user::{PublicUser, User, UserKind};
