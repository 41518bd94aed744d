//! Entity domain - Typed records mapped onto the key-value store
//!
//! Each entity type is described by an [`EntityKind`]; types that must be
//! enumerable also implement [`IndexedKind`] and get an [`Index`] of their keys.
//!
//! ```text
//! IndexedEntity<K>   ← record + index maintenance + fixture seeding
//!     ↓        ↘
//! Entity<K>     Index
//!     ↓        ↙
//! KeyValueStore      ← get / put / delete / scan
//! ```

mod index;
mod indexed;
mod kind;
mod record;

pub use index::{Index, IndexPage, Page};
pub use indexed::IndexedEntity;
pub use kind::{require_key_field, EntityKind, IndexedKind};
pub use record::Entity;
