//! Read operations for the campus graph.

use chrono::{DateTime, Utc};
use neo4rs::query;
use uuid::Uuid;

use campusgraph_core::{
    Entity, EntityAttributes, EntityId, EntityKind, EntityStatus, RelationshipType,
};

use crate::client::{GraphClient, GraphError};
use crate::mutations::relationship_cypher_type;

/// A stored relationship definition: `(from, to)` kind slugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRecord {
    pub name: String,
    pub from: String,
    pub to: String,
}

impl GraphClient {
    // ── Entities ─────────────────────────────────────────────────

    /// Ids of every entity of `kind`, oldest first. No page limit.
    pub async fn entity_ids(&self, kind: EntityKind) -> Result<Vec<EntityId>, GraphError> {
        let label = kind.label();
        let cypher = format!(
            "MATCH (n:{label} {{dataset: $dataset}})
             RETURN n.id AS id
             ORDER BY n.created_at"
        );

        let q = query(&cypher).param("dataset", self.dataset().to_string());

        let rows = self.query_rows(q).await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: String = row
                .get("id")
                .map_err(|e| GraphError::Serialization(format!("Missing entity id: {e}")))?;
            ids.push(parse_id(&raw)?);
        }
        Ok(ids)
    }

    /// Count entities of `kind` in the dataset.
    pub async fn count_entities(&self, kind: EntityKind) -> Result<i64, GraphError> {
        let label = kind.label();
        let cypher = format!(
            "MATCH (n:{label} {{dataset: $dataset}})
             RETURN count(n) AS cnt"
        );

        let q = query(&cypher).param("dataset", self.dataset().to_string());
        self.query_count(q).await
    }

    /// Count how many of `ids` exist as entities of `kind`.
    pub async fn count_with_ids(
        &self,
        kind: EntityKind,
        ids: &[EntityId],
    ) -> Result<i64, GraphError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let label = kind.label();
        let cypher = format!(
            "MATCH (n:{label} {{dataset: $dataset}})
             WHERE n.id IN $ids
             RETURN count(DISTINCT n) AS cnt"
        );

        let q = query(&cypher)
            .param("dataset", self.dataset().to_string())
            .param(
                "ids",
                ids.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
            );
        self.query_count(q).await
    }

    /// Fetch one entity by id.
    pub async fn get_entity(&self, id: &EntityId) -> Result<Entity, GraphError> {
        let q = query(
            "MATCH (n:Entity {dataset: $dataset, id: $id})
             RETURN n",
        )
        .param("dataset", self.dataset().to_string())
        .param("id", id.to_string());

        match self.query_one(q).await? {
            Some(row) => {
                let node: neo4rs::Node = row.get("n").map_err(|e| {
                    GraphError::Serialization(format!("Failed to deserialize node: {e}"))
                })?;
                neo4j_node_to_entity(&node)
            }
            None => Err(GraphError::NotFound {
                label: "Entity".to_string(),
                id: id.to_string(),
                dataset: self.dataset().to_string(),
            }),
        }
    }

    // ── Relationships ────────────────────────────────────────────

    /// Look up a registered relationship definition by name.
    pub async fn find_relationship_definition(
        &self,
        name: &str,
    ) -> Result<Option<DefinitionRecord>, GraphError> {
        let q = query(
            "MATCH (d:RelationshipDefinition {dataset: $dataset, name: $name})
             RETURN d.from AS from, d.to AS to",
        )
        .param("dataset", self.dataset().to_string())
        .param("name", name.to_string());

        Ok(self.query_one(q).await?.map(|row| DefinitionRecord {
            name: name.to_string(),
            from: row.get::<String>("from").unwrap_or_default(),
            to: row.get::<String>("to").unwrap_or_default(),
        }))
    }

    /// Targets of `from_id` under `definition`, in edge order.
    pub async fn outgoing_edges(
        &self,
        definition: &RelationshipType,
        from_id: &EntityId,
    ) -> Result<Vec<EntityId>, GraphError> {
        let from_label = definition.from.label();
        let rel_type = relationship_cypher_type(definition);
        let cypher = format!(
            "MATCH (a:{from_label} {{dataset: $dataset, id: $from_id}})-[r:{rel_type}]->(b)
             RETURN b.id AS id
             ORDER BY r.order"
        );

        let q = query(&cypher)
            .param("dataset", self.dataset().to_string())
            .param("from_id", from_id.to_string());

        let rows = self.query_rows(q).await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: String = row
                .get("id")
                .map_err(|e| GraphError::Serialization(format!("Missing target id: {e}")))?;
            ids.push(parse_id(&raw)?);
        }
        Ok(ids)
    }

    /// Count every catalog-typed edge in the dataset.
    pub async fn count_edges(&self) -> Result<i64, GraphError> {
        let q = query(
            "MATCH (a:Entity {dataset: $dataset})-[r]->(b:Entity {dataset: $dataset})
             RETURN count(r) AS cnt",
        )
        .param("dataset", self.dataset().to_string());
        self.query_count(q).await
    }

    // ── Vocabulary terms ─────────────────────────────────────────

    /// Count terms in a vocabulary.
    pub async fn count_terms(&self, vocabulary: &str) -> Result<i64, GraphError> {
        let q = query(
            "MATCH (t:Term {dataset: $dataset, vocabulary: $vocabulary})
             RETURN count(t) AS cnt",
        )
        .param("dataset", self.dataset().to_string())
        .param("vocabulary", vocabulary.to_string());
        self.query_count(q).await
    }

    /// The slug of the term attached to an entity in `vocabulary`.
    pub async fn term_of(
        &self,
        entity: &EntityId,
        vocabulary: &str,
    ) -> Result<Option<String>, GraphError> {
        let q = query(
            "MATCH (n:Entity {dataset: $dataset, id: $id})
                   -[:HAS_TERM]->(t:Term {vocabulary: $vocabulary})
             RETURN t.slug AS slug LIMIT 1",
        )
        .param("dataset", self.dataset().to_string())
        .param("id", entity.to_string())
        .param("vocabulary", vocabulary.to_string());

        Ok(self
            .query_one(q)
            .await?
            .and_then(|row| row.get::<String>("slug").ok()))
    }
}

fn parse_id(raw: &str) -> Result<EntityId, GraphError> {
    Uuid::parse_str(raw)
        .map(EntityId)
        .map_err(|e| GraphError::Serialization(format!("Invalid entity id {raw}: {e}")))
}

fn parse_status(raw: &str) -> EntityStatus {
    match raw {
        "trash" => EntityStatus::Trash,
        _ => EntityStatus::Publish,
    }
}

/// Convert a neo4rs::Node into an [`Entity`].
fn neo4j_node_to_entity(node: &neo4rs::Node) -> Result<Entity, GraphError> {
    let id: String = node.get("id").unwrap_or_default();
    let kind: String = node.get("kind").unwrap_or_default();
    let kind = kind
        .parse::<EntityKind>()
        .map_err(|e| GraphError::Serialization(e.to_string()))?;
    let status: String = node.get("status").unwrap_or_default();
    let created_at = node
        .get::<String>("created_at")
        .ok()
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Ok(Entity {
        id: parse_id(&id)?,
        kind,
        attributes: EntityAttributes {
            title: node.get("title").unwrap_or_default(),
            content: node.get("content").unwrap_or_default(),
        },
        status: parse_status(&status),
        created_at,
    })
}
