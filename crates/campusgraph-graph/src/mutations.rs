//! Write operations for the campus graph.
//!
//! Nodes are identified by (dataset, id). Edge replacement runs in a single
//! transaction so a source never has a half-written edge set.

use chrono::Utc;
use neo4rs::query;

use campusgraph_core::{EntityId, NewEntity, RelationshipType, Term};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    // ── Entities ─────────────────────────────────────────────────

    /// Create an entity node and return its new id.
    pub async fn create_entity(&self, entity: &NewEntity) -> Result<EntityId, GraphError> {
        let id = EntityId::new();
        let label = entity.kind.label();
        let cypher = format!(
            "CREATE (n:Entity:{label} {{dataset: $dataset, id: $id}})
             SET n.kind = $kind, n.title = $title, n.content = $content,
                 n.status = $status, n.created_at = $now"
        );

        let q = query(&cypher)
            .param("dataset", self.dataset().to_string())
            .param("id", id.to_string())
            .param("kind", entity.kind.slug())
            .param("title", entity.attributes.title.clone())
            .param("content", entity.attributes.content.clone())
            .param("status", entity.status.as_str())
            .param("now", Utc::now().to_rfc3339());

        self.run(q).await?;
        Ok(id)
    }

    /// Permanently delete an entity together with every relationship
    /// touching it.
    pub async fn delete_entity(&self, id: &EntityId) -> Result<(), GraphError> {
        let q = query(
            "MATCH (n:Entity {dataset: $dataset, id: $id})
             DETACH DELETE n
             RETURN count(n) AS cnt",
        )
        .param("dataset", self.dataset().to_string())
        .param("id", id.to_string());

        self.expect_entity(q, id).await
    }

    /// Move an entity to trash without touching its relationships.
    pub async fn trash_entity(&self, id: &EntityId) -> Result<(), GraphError> {
        let q = query(
            "MATCH (n:Entity {dataset: $dataset, id: $id})
             SET n.status = 'trash'
             RETURN count(n) AS cnt",
        )
        .param("dataset", self.dataset().to_string())
        .param("id", id.to_string());

        self.expect_entity(q, id).await
    }

    async fn expect_entity(&self, q: neo4rs::Query, id: &EntityId) -> Result<(), GraphError> {
        if self.query_count(q).await? == 0 {
            return Err(GraphError::NotFound {
                label: "Entity".to_string(),
                id: id.to_string(),
                dataset: self.dataset().to_string(),
            });
        }
        Ok(())
    }

    // ── Relationship definitions ─────────────────────────────────

    /// Upsert a relationship definition node.
    pub async fn register_relationship(
        &self,
        definition: &RelationshipType,
    ) -> Result<(), GraphError> {
        let q = query(
            "MERGE (d:RelationshipDefinition {dataset: $dataset, name: $name})
             SET d.from = $from, d.to = $to, d.cardinality = $cardinality",
        )
        .param("dataset", self.dataset().to_string())
        .param("name", definition.name)
        .param("from", definition.from.slug())
        .param("to", definition.to.slug())
        .param("cardinality", ser(&definition.cardinality));

        self.run(q).await?;
        tracing::debug!(name = definition.name, "Registered relationship definition");
        Ok(())
    }

    // ── Edges ────────────────────────────────────────────────────

    /// Replace every outgoing `definition` edge of `from_id` with edges to
    /// `to_ids`, numbered by position.
    ///
    /// Endpoints are checked first; an unknown source or target leaves the
    /// existing edges untouched.
    pub async fn replace_edges(
        &self,
        definition: &RelationshipType,
        from_id: &EntityId,
        to_ids: &[EntityId],
    ) -> Result<(), GraphError> {
        let from_label = definition.from.label();
        let to_label = definition.to.label();
        let rel_type = relationship_cypher_type(definition);

        if self.count_with_ids(definition.from, &[*from_id]).await? != 1 {
            return Err(GraphError::NotFound {
                label: from_label.to_string(),
                id: from_id.to_string(),
                dataset: self.dataset().to_string(),
            });
        }

        let target_ids: Vec<String> = to_ids.iter().map(|id| id.to_string()).collect();
        let mut distinct = target_ids.clone();
        distinct.sort();
        distinct.dedup();
        let found = self.count_with_ids(definition.to, to_ids).await?;
        if found != distinct.len() as i64 {
            return Err(GraphError::NotFound {
                label: to_label.to_string(),
                id: format!("{} of {} targets", distinct.len() as i64 - found, distinct.len()),
                dataset: self.dataset().to_string(),
            });
        }

        let mut txn = self.start_txn().await?;

        let clear = format!(
            "MATCH (a:{from_label} {{dataset: $dataset, id: $from_id}})-[r:{rel_type}]->()
             DELETE r"
        );
        txn.run(
            query(&clear)
                .param("dataset", self.dataset().to_string())
                .param("from_id", from_id.to_string()),
        )
        .await?;

        if !target_ids.is_empty() {
            let create = format!(
                "MATCH (a:{from_label} {{dataset: $dataset, id: $from_id}})
                 UNWIND range(0, size($to_ids) - 1) AS idx
                 MATCH (b:{to_label} {{dataset: $dataset, id: $to_ids[idx]}})
                 CREATE (a)-[:{rel_type} {{order: idx}}]->(b)"
            );
            txn.run(
                query(&create)
                    .param("dataset", self.dataset().to_string())
                    .param("from_id", from_id.to_string())
                    .param("to_ids", target_ids),
            )
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    // ── Vocabulary terms ─────────────────────────────────────────

    /// Create any missing terms in a vocabulary.
    pub async fn ensure_terms(&self, vocabulary: &str, terms: &[Term]) -> Result<(), GraphError> {
        let mut txn = self.start_txn().await?;

        for term in terms {
            let q = query(
                "MERGE (t:Term {dataset: $dataset, vocabulary: $vocabulary, slug: $slug})
                 ON CREATE SET t.name = $name",
            )
            .param("dataset", self.dataset().to_string())
            .param("vocabulary", vocabulary.to_string())
            .param("slug", term.slug.clone())
            .param("name", term.name.clone());

            txn.run(q).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Point an entity's label in `vocabulary` at `slug`.
    pub async fn attach_term(
        &self,
        entity: &EntityId,
        vocabulary: &str,
        slug: &str,
    ) -> Result<(), GraphError> {
        let q = query(
            "MATCH (n:Entity {dataset: $dataset, id: $id})
             OPTIONAL MATCH (n)-[old:HAS_TERM]->(:Term {dataset: $dataset, vocabulary: $vocabulary})
             DELETE old
             WITH DISTINCT n
             MERGE (t:Term {dataset: $dataset, vocabulary: $vocabulary, slug: $slug})
               ON CREATE SET t.name = $slug
             MERGE (n)-[:HAS_TERM]->(t)
             RETURN count(n) AS cnt",
        )
        .param("dataset", self.dataset().to_string())
        .param("id", entity.to_string())
        .param("vocabulary", vocabulary.to_string())
        .param("slug", slug.to_string());

        self.expect_entity(q, entity).await
    }

    /// Delete every term of a vocabulary. Returns the count.
    pub async fn delete_all_terms(&self, vocabulary: &str) -> Result<i64, GraphError> {
        let q = query(
            "MATCH (t:Term {dataset: $dataset, vocabulary: $vocabulary})
             DETACH DELETE t
             RETURN count(t) AS cnt",
        )
        .param("dataset", self.dataset().to_string())
        .param("vocabulary", vocabulary.to_string());

        self.query_count(q).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Neo4j relationship type for a catalog entry, e.g. `UNIVERSITY_TO_CITY`.
pub(crate) fn relationship_cypher_type(definition: &RelationshipType) -> String {
    definition.name.to_uppercase()
}

fn ser<T: serde::Serialize>(val: &T) -> String {
    serde_json::to_value(val)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusgraph_core::catalog::{CAMPUS_TO_PERSON, UNIVERSITY_TO_CITY};
    use campusgraph_core::Cardinality;

    #[test]
    fn cypher_type_is_screaming_snake() {
        assert_eq!(relationship_cypher_type(&UNIVERSITY_TO_CITY), "UNIVERSITY_TO_CITY");
        assert_eq!(relationship_cypher_type(&CAMPUS_TO_PERSON), "CAMPUS_TO_PERSON");
    }

    #[test]
    fn cardinality_serializes_bare() {
        assert_eq!(ser(&Cardinality::OneToMany), "one-to-many");
        assert_eq!(ser(&Cardinality::ManyToMany), "many-to-many");
    }
}
