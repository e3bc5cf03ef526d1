//! Cascading removal of the generated dataset.

use campusgraph_core::{
    ContentStore, EntityKind, RelationshipStore, Relationships, StoreError, TaxonomyStore,
    PERSON_ROLE_VOCABULARY,
};

use crate::error::Result;
use crate::report::{KindPurge, PurgeReport};

/// Deletes every entity kind by kind, clearing outgoing edges first, then the
/// person role vocabulary.
pub struct TeardownManager<'s, S: ?Sized> {
    store: &'s S,
    relationships: Relationships,
}

impl<'s, S> TeardownManager<'s, S>
where
    S: ContentStore + TaxonomyStore + RelationshipStore + ?Sized,
{
    /// Resolve the catalog against `store`. Fails if any type is missing.
    pub async fn new(store: &'s S) -> std::result::Result<Self, StoreError> {
        let relationships = Relationships::resolve(store).await?;
        Ok(Self::with_relationships(store, relationships))
    }

    pub fn with_relationships(store: &'s S, relationships: Relationships) -> Self {
        Self {
            store,
            relationships,
        }
    }

    /// Delete every entity of `kind`, whatever its status.
    ///
    /// Each entity's outgoing edge sets are emptied before it is
    /// force-deleted; if that fails the entity is left in place and counted
    /// as failed.
    pub async fn purge_kind(&self, kind: EntityKind) -> Result<KindPurge> {
        let ids = self.store.entity_ids(kind).await?;
        let mut outcome = KindPurge::empty(kind);
        outcome.found = ids.len();

        if ids.is_empty() {
            tracing::info!(kind = %kind, "No entities to delete");
            return Ok(outcome);
        }

        'entities: for id in &ids {
            for handle in self.relationships.outgoing(kind) {
                if let Err(e) = self.store.replace_edges(handle, id, &[]).await {
                    tracing::warn!(
                        id = %id,
                        relationship = handle.name(),
                        error = %e,
                        "Failed to clear edges; skipping delete"
                    );
                    outcome.failed += 1;
                    continue 'entities;
                }
            }

            match self.store.delete_entity(id, true).await {
                Ok(()) => outcome.deleted += 1,
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Failed to delete entity");
                    outcome.failed += 1;
                }
            }
        }

        tracing::info!(
            kind = %kind,
            found = outcome.found,
            deleted = outcome.deleted,
            failed = outcome.failed,
            "Purged {}",
            kind.plural()
        );
        Ok(outcome)
    }

    /// Purge every kind in teardown order, then every person role term.
    pub async fn purge_all(&self) -> Result<PurgeReport> {
        let mut report = PurgeReport::default();
        for kind in EntityKind::ALL {
            report.kinds.push(self.purge_kind(kind).await?);
        }

        report.terms_removed = self.store.delete_all_terms(PERSON_ROLE_VOCABULARY).await?;
        tracing::info!(removed = report.terms_removed, "Deleted person role terms");

        Ok(report)
    }
}
