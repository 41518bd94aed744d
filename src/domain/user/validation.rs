//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains a control character")]
    InvalidUsernameCharacter,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),
}

pub const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_USERNAME_LENGTH: usize = 64;

/// Validate a username
///
/// Rules:
/// - Cannot be blank
/// - Maximum 64 characters
/// - No control characters (spaces are fine, the name is also the display name)
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.trim().is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if username.chars().any(char::is_control) {
        return Err(UserValidationError::InvalidUsernameCharacter);
    }

    Ok(())
}

/// Validate a password (minimum 6 characters)
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}
