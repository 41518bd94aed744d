//! Per-type entity descriptors

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Describes one entity type: its namespace, record shape and key derivation
pub trait EntityKind: Send + Sync + 'static {
    /// The record stored for each instance
    type State: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Namespace of the record keys (`"<ENTITY_NAME>:<id>"`)
    const ENTITY_NAME: &'static str;

    /// Returned by reads of an instance that was never written
    fn initial_state() -> Self::State;

    /// Derives the instance key from a record
    fn key_of(state: &Self::State) -> Result<String, DomainError>;

    /// Full store key of the instance `id`
    fn storage_key(id: &str) -> String {
        format!("{}:{}", Self::ENTITY_NAME, id)
    }
}

/// An entity type whose instances are enumerable through an index
pub trait IndexedKind: EntityKind {
    /// Name of the index listing every instance
    const INDEX_NAME: &'static str;

    /// Fixture records inserted when the index is first found empty
    fn seed_data() -> Vec<Self::State>;
}

/// Returns `value` as a key, or a validation error naming `field` when it is blank
pub fn require_key_field(
    entity: &str,
    field: &str,
    value: &str,
) -> Result<String, DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!(
            "Cannot derive {} key: '{}' is required",
            entity, field
        )));
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoteKind;

    impl EntityKind for NoteKind {
        type State = String;

        const ENTITY_NAME: &'static str = "note";

        fn initial_state() -> Self::State {
            String::new()
        }

        fn key_of(state: &Self::State) -> Result<String, DomainError> {
            require_key_field("note", "text", state)
        }
    }

    #[test]
    fn test_storage_key_is_namespaced() {
        assert_eq!(NoteKind::storage_key("n1"), "note:n1");
    }

    #[test]
    fn test_require_key_field() {
        assert_eq!(NoteKind::key_of(&"hello".to_string()).unwrap(), "hello");

        let err = NoteKind::key_of(&"  ".to_string()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("'text' is required"));
    }
}
