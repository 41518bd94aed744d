//! Infrastructure services
//!
//! Each service takes the shared key-value store and exposes the operations the
//! HTTP layer maps onto routes.

mod auth_service;
mod chat_service;
mod product_service;

pub use auth_service::{AuthService, LoginResult};
pub use chat_service::ChatService;
pub use product_service::ProductService;
