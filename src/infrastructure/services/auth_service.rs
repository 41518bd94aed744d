//! Registration and login over the user entity

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::entity::IndexedEntity;
use crate::domain::storage::KeyValueStore;
use crate::domain::user::{validate_password, validate_username, PublicUser, User, UserKind};
use crate::domain::DomainError;

type UserEntity = IndexedEntity<UserKind>;

/// Successful login
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginResult {
    pub user: PublicUser,
    pub token: String,
}

/// User registration and login.
///
/// Passwords are stored and compared as given.
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    page_size: usize,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// Registers a user whose id is their name
    pub async fn register(&self, name: &str, password: &str) -> Result<PublicUser, DomainError> {
        validate_username(name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        if UserEntity::new(Arc::clone(&self.store), name).exists().await? {
            return Err(DomainError::conflict("User with this name already exists."));
        }

        let user = UserEntity::create(&self.store, User::new(name, password)).await?;
        info!(user = %user.name, "Registered user");

        Ok(PublicUser::from(user))
    }

    /// Checks credentials and returns the user with a session token
    pub async fn login(&self, name: &str, password: &str) -> Result<LoginResult, DomainError> {
        if name.is_empty() || password.is_empty() {
            return Err(DomainError::validation("Username and password are required."));
        }

        let entity = UserEntity::new(Arc::clone(&self.store), name);

        if !entity.exists().await? {
            return Err(DomainError::not_found("User not found."));
        }

        let user = entity.get_state().await?;

        if !user.password_matches(password) {
            debug!(user = %name, "Rejected login");
            return Err(DomainError::invalid_credentials("Invalid credentials."));
        }

        let token = format!("mock-token-for-{}", user.id);

        Ok(LoginResult {
            user: PublicUser::from(user),
            token,
        })
    }

    /// Every user, without passwords
    pub async fn list_users(&self) -> Result<Vec<PublicUser>, DomainError> {
        UserEntity::ensure_seed(&self.store).await?;

        let users = UserEntity::list_all(&self.store, self.page_size).await?;

        Ok(users.into_iter().map(PublicUser::from).collect())
    }
}
