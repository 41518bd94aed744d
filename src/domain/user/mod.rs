//! User domain
//!
//! Users are keyed by their name, which doubles as the login handle.

mod entity;
mod validation;

pub use entity::{PublicUser, User, UserKind};
pub use validation::{
    validate_password, validate_username, UserValidationError, MIN_PASSWORD_LENGTH,
};
