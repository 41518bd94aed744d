//! Storefront API endpoints, served under `/api`

pub mod auth;
pub mod chats;
pub mod products;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/facets", get(products::get_facets))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/users", get(users::list_users))
        .route("/users/{user_id}/products", get(users::list_user_products))
        .route("/chats", get(chats::list_chats))
        .route(
            "/chats/{chat_id}/messages",
            get(chats::list_messages).post(chats::send_message),
        )
}
