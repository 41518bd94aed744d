//! User entity and related types

use serde::{Deserialize, Serialize};

use crate::domain::entity::{require_key_field, EntityKind, IndexedKind};
use crate::domain::DomainError;

/// Stored user record.
///
/// The password is kept as given; this store is not an authentication system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    /// A user whose id is its name
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        let name = name.into();

        Self {
            id: name.clone(),
            name,
            password: Some(password.into()),
        }
    }

    /// Compares the stored password with `candidate`
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_deref() == Some(candidate)
    }
}

/// User as exposed outside the store, without the password
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// Users are keyed by name
pub struct UserKind;

impl EntityKind for UserKind {
    type State = User;

    const ENTITY_NAME: &'static str = "user";

    fn initial_state() -> User {
        User {
            id: String::new(),
            name: String::new(),
            password: Some(String::new()),
        }
    }

    fn key_of(state: &User) -> Result<String, DomainError> {
        require_key_field("user", "name", &state.name)
    }
}

impl IndexedKind for UserKind {
    const INDEX_NAME: &'static str = "users";

    fn seed_data() -> Vec<User> {
        vec![
            User::new("User A", "password123"),
            User::new("User B", "password123"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_is_name() {
        let user = User {
            id: "ignored".to_string(),
            name: "alice".to_string(),
            password: None,
        };

        assert_eq!(UserKind::key_of(&user).unwrap(), "alice");
        assert_eq!(UserKind::storage_key("alice"), "user:alice");
    }

    #[test]
    fn test_key_requires_name() {
        let user = User::new("", "secret1");

        assert!(matches!(
            UserKind::key_of(&user),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_password_matches() {
        let user = User::new("alice", "secret1");

        assert!(user.password_matches("secret1"));
        assert!(!user.password_matches("wrong"));
        assert!(!UserKind::initial_state().password_matches("x"));
    }

    #[test]
    fn test_public_user_drops_password() {
        let user = User::new("alice", "secret1");

        let public = serde_json::to_value(PublicUser::from(&user)).unwrap();

        assert_eq!(public, json!({"id": "alice", "name": "alice"}));
    }

    #[test]
    fn test_user_without_password_deserializes() {
        let user: User = serde_json::from_value(json!({"id": "a", "name": "a"})).unwrap();
        assert_eq!(user.password, None);
    }

    #[test]
    fn test_seed_users() {
        let seeds = UserKind::seed_data();

        assert_eq!(seeds.len(), 2);
        assert!(seeds.iter().all(|u| u.id == u.name));
    }
}
