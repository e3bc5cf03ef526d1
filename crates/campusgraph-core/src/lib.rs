//! campusgraph-core: Shared types, relationship catalog, and store traits.
//!
//! This crate provides the foundational pieces used by every campusgraph component:
//! - Entity types (University, City, Person, Course, Campus) and their attributes
//! - The fixed catalog of six relationship types and their sampling ranges
//! - Store traits for content, classification, and relationship backends
//! - An in-memory store implementing those traits
//! - Common error types

pub mod catalog;
pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use catalog::{Cardinality, DegreeRange, RelationshipHandle, RelationshipType, Relationships};
pub use error::{CoreError, StoreError};
pub use memory::MemoryStore;
pub use store::{ContentStore, RelationshipStore, SeedStore, TaxonomyStore};
pub use types::{
    Edge, Entity, EntityAttributes, EntityId, EntityKind, EntityStatus, NewEntity, PersonRole,
    Term, PERSON_ROLE_VOCABULARY,
};
