//! Wire types shared by every endpoint
//!
//! Responses use the envelope `{ "success": bool, "data"?: T, "error"?: string }`.

pub mod error;
pub mod json;
pub mod response;

pub use error::ApiError;
pub use json::Json;
pub use response::ApiResponse;
