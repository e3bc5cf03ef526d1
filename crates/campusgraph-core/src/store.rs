//! Store traits implemented by every backend.
//!
//! The seeder never talks to a database directly: entity persistence,
//! classification, and relationship edges each sit behind a trait so the
//! same generator and teardown run against Neo4j or [`crate::MemoryStore`].

use async_trait::async_trait;

use crate::catalog::{RelationshipHandle, RelationshipType};
use crate::error::StoreError;
use crate::types::{EntityId, EntityKind, NewEntity, Term};

/// Entity persistence.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Create an entity and return its id.
    async fn create_entity(&self, entity: NewEntity) -> Result<EntityId, StoreError>;

    /// Delete an entity. `force` removes it permanently, together with any
    /// edge pointing at it; otherwise it is moved to trash.
    async fn delete_entity(&self, id: &EntityId, force: bool) -> Result<(), StoreError>;

    /// Ids of every entity of `kind`, in any status, without a page limit.
    async fn entity_ids(&self, kind: EntityKind) -> Result<Vec<EntityId>, StoreError>;
}

/// Classification vocabularies.
#[async_trait]
pub trait TaxonomyStore: Send + Sync {
    /// Make sure each term exists in `vocabulary`. Existing terms are kept.
    async fn ensure_terms(&self, vocabulary: &str, terms: &[Term]) -> Result<(), StoreError>;

    /// Set the entity's label in `vocabulary` to `slug`, creating the term
    /// if needed and replacing any previous label.
    async fn attach_term(
        &self,
        entity: &EntityId,
        vocabulary: &str,
        slug: &str,
    ) -> Result<(), StoreError>;

    /// Delete every term in `vocabulary`, used or not. Returns the count.
    async fn delete_all_terms(&self, vocabulary: &str) -> Result<usize, StoreError>;
}

/// Relationship registry and edge storage.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Declare a relationship type. Idempotent.
    async fn register_relationship(&self, definition: &RelationshipType)
        -> Result<(), StoreError>;

    /// Handle for a registered type, or [`StoreError::RelationshipUndefined`].
    async fn resolve(
        &self,
        from: EntityKind,
        to: EntityKind,
        name: &str,
    ) -> Result<RelationshipHandle, StoreError>;

    /// Replace the outgoing edge set of `from_id` under `handle` with
    /// exactly `to_ids`, in order.
    async fn replace_edges(
        &self,
        handle: &RelationshipHandle,
        from_id: &EntityId,
        to_ids: &[EntityId],
    ) -> Result<(), StoreError>;

    /// Current targets of `from_id` under `handle`, in stored order.
    async fn outgoing_edges(
        &self,
        handle: &RelationshipHandle,
        from_id: &EntityId,
    ) -> Result<Vec<EntityId>, StoreError>;
}

/// Everything the seeder needs from a backend.
pub trait SeedStore: ContentStore + TaxonomyStore + RelationshipStore {}

impl<T> SeedStore for T where T: ContentStore + TaxonomyStore + RelationshipStore {}
