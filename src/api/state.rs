//! Application state for shared services

use std::sync::Arc;

use crate::domain::storage::KeyValueStore;
use crate::infrastructure::services::{AuthService, ChatService, ProductService};

/// Services shared by every handler, all backed by the same store
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub auth_service: Arc<AuthService>,
    pub product_service: Arc<ProductService>,
    pub chat_service: Arc<ChatService>,
}

impl AppState {
    /// Builds every service over `store`, listing collections `page_size` keys at a time
    pub fn new(store: Arc<dyn KeyValueStore>, page_size: usize) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(Arc::clone(&store), page_size)),
            product_service: Arc::new(ProductService::new(Arc::clone(&store), page_size)),
            chat_service: Arc::new(ChatService::new(Arc::clone(&store), page_size)),
            store,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
