//! Store trait implementations over [`GraphClient`].

use async_trait::async_trait;

use campusgraph_core::catalog;
use campusgraph_core::{
    ContentStore, EntityId, EntityKind, NewEntity, RelationshipHandle, RelationshipStore,
    RelationshipType, StoreError, TaxonomyStore, Term,
};

use crate::client::{GraphClient, GraphError};

impl From<GraphError> for StoreError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::NotFound { id, .. } => StoreError::NotFound { id },
            other => StoreError::Backend {
                backend: "neo4j".to_string(),
                source: anyhow::Error::new(other),
            },
        }
    }
}

#[async_trait]
impl ContentStore for GraphClient {
    async fn create_entity(&self, entity: NewEntity) -> Result<EntityId, StoreError> {
        Ok(GraphClient::create_entity(self, &entity).await?)
    }

    async fn delete_entity(&self, id: &EntityId, force: bool) -> Result<(), StoreError> {
        if force {
            GraphClient::delete_entity(self, id).await?;
        } else {
            self.trash_entity(id).await?;
        }
        Ok(())
    }

    async fn entity_ids(&self, kind: EntityKind) -> Result<Vec<EntityId>, StoreError> {
        Ok(GraphClient::entity_ids(self, kind).await?)
    }
}

#[async_trait]
impl TaxonomyStore for GraphClient {
    async fn ensure_terms(&self, vocabulary: &str, terms: &[Term]) -> Result<(), StoreError> {
        Ok(GraphClient::ensure_terms(self, vocabulary, terms).await?)
    }

    async fn attach_term(
        &self,
        entity: &EntityId,
        vocabulary: &str,
        slug: &str,
    ) -> Result<(), StoreError> {
        Ok(GraphClient::attach_term(self, entity, vocabulary, slug).await?)
    }

    async fn delete_all_terms(&self, vocabulary: &str) -> Result<usize, StoreError> {
        let removed = GraphClient::delete_all_terms(self, vocabulary).await?;
        Ok(removed.max(0) as usize)
    }
}

#[async_trait]
impl RelationshipStore for GraphClient {
    async fn register_relationship(
        &self,
        definition: &RelationshipType,
    ) -> Result<(), StoreError> {
        Ok(GraphClient::register_relationship(self, definition).await?)
    }

    async fn resolve(
        &self,
        from: EntityKind,
        to: EntityKind,
        name: &str,
    ) -> Result<RelationshipHandle, StoreError> {
        let undefined = || StoreError::RelationshipUndefined {
            name: name.to_string(),
            from,
            to,
        };

        let definition = catalog::find(name).map_err(|_| undefined())?;
        match self.find_relationship_definition(name).await? {
            Some(record) if record.from == from.slug() && record.to == to.slug() => {
                if definition.from != from || definition.to != to {
                    return Err(undefined());
                }
                Ok(RelationshipHandle::new(definition))
            }
            _ => Err(undefined()),
        }
    }

    async fn replace_edges(
        &self,
        handle: &RelationshipHandle,
        from_id: &EntityId,
        to_ids: &[EntityId],
    ) -> Result<(), StoreError> {
        GraphClient::replace_edges(self, handle.definition(), from_id, to_ids)
            .await
            .map_err(|e| match e {
                GraphError::NotFound { id, label, .. } => StoreError::InvalidEndpoint {
                    id,
                    expected: label.parse().unwrap_or(handle.to_kind()),
                },
                other => other.into(),
            })
    }

    async fn outgoing_edges(
        &self,
        handle: &RelationshipHandle,
        from_id: &EntityId,
    ) -> Result<Vec<EntityId>, StoreError> {
        Ok(GraphClient::outgoing_edges(self, handle.definition(), from_id).await?)
    }
}
