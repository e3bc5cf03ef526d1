//! In-process store.
//!
//! Implements every store trait over plain collections behind a mutex.
//! Each mutating call is appended to an operation log, and individual
//! creates, deletes, or edge replacements can be made to fail, which is
//! what the generator and teardown tests assert against.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::catalog::{self, RelationshipHandle, RelationshipType};
use crate::error::StoreError;
use crate::store::{ContentStore, RelationshipStore, TaxonomyStore};
use crate::types::{
    Edge, Entity, EntityId, EntityKind, EntityStatus, NewEntity, PersonRole, Term,
    PERSON_ROLE_VOCABULARY,
};

/// A mutating call recorded by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    RegisterRelationship {
        name: String,
    },
    CreateEntity {
        kind: EntityKind,
        id: EntityId,
    },
    DeleteEntity {
        id: EntityId,
        force: bool,
    },
    AttachTerm {
        id: EntityId,
        vocabulary: String,
        slug: String,
    },
    DeleteAllTerms {
        vocabulary: String,
    },
    ReplaceEdges {
        relationship: String,
        from_id: EntityId,
        to_ids: Vec<EntityId>,
    },
}

#[derive(Default)]
struct State {
    entities: Vec<Entity>,
    registered: HashSet<String>,
    terms: HashMap<String, Vec<Term>>,
    labels: HashMap<(EntityId, String), String>,
    edges: HashMap<(String, EntityId), Vec<EntityId>>,
    ops: Vec<StoreOp>,
    create_attempts: usize,
    failing_creates: HashSet<usize>,
    failing_deletes: HashSet<EntityId>,
    failing_replaces: HashSet<EntityId>,
}

impl State {
    fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| &e.id == id)
    }

    fn expect_kind(&self, id: &EntityId, expected: EntityKind) -> Result<(), StoreError> {
        match self.entity(id) {
            Some(e) if e.kind == expected => Ok(()),
            _ => Err(StoreError::InvalidEndpoint {
                id: id.to_string(),
                expected,
            }),
        }
    }
}

/// Store backed by in-process collections.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// An empty store with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store with every catalog relationship type and the
    /// person role vocabulary already registered.
    pub fn with_schema() -> Self {
        let store = Self::new();
        {
            let mut state = store.state();
            for t in &catalog::CATALOG {
                state.registered.insert(t.name.to_string());
            }
            state
                .terms
                .insert(PERSON_ROLE_VOCABULARY.to_string(), PersonRole::default_terms());
        }
        store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Failure injection ────────────────────────────────────────

    /// Make the given create attempts (0-based, counted across all kinds)
    /// fail.
    pub fn fail_create_attempts(&self, attempts: impl IntoIterator<Item = usize>) {
        self.state().failing_creates.extend(attempts);
    }

    /// Make every delete of `id` fail.
    pub fn fail_delete(&self, id: EntityId) {
        self.state().failing_deletes.insert(id);
    }

    /// Make every edge replacement with `from_id` as source fail.
    pub fn fail_replace(&self, from_id: EntityId) {
        self.state().failing_replaces.insert(from_id);
    }

    // ── Inspection ───────────────────────────────────────────────

    pub fn entities(&self, kind: EntityKind) -> Vec<Entity> {
        self.state()
            .entities
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    pub fn entity(&self, id: &EntityId) -> Option<Entity> {
        self.state().entity(id).cloned()
    }

    pub fn entity_count(&self) -> usize {
        self.state().entities.len()
    }

    pub fn terms(&self, vocabulary: &str) -> Vec<Term> {
        self.state()
            .terms
            .get(vocabulary)
            .cloned()
            .unwrap_or_default()
    }

    /// The label slug attached to `id` in `vocabulary`, if any.
    pub fn label(&self, id: &EntityId, vocabulary: &str) -> Option<String> {
        self.state()
            .labels
            .get(&(*id, vocabulary.to_string()))
            .cloned()
    }

    pub fn targets(&self, relationship: &str, from_id: &EntityId) -> Vec<EntityId> {
        self.state()
            .edges
            .get(&(relationship.to_string(), *from_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Every live edge, sorted by relationship and source.
    pub fn edges(&self) -> Vec<Edge> {
        let state = self.state();
        let mut edges: Vec<Edge> = state
            .edges
            .iter()
            .flat_map(|((relationship, from_id), to_ids)| {
                to_ids.iter().enumerate().map(move |(order, to_id)| Edge {
                    relationship: relationship.clone(),
                    from_id: *from_id,
                    to_id: *to_id,
                    order,
                })
            })
            .collect();
        edges.sort_by(|a, b| {
            (&a.relationship, a.from_id, a.order).cmp(&(&b.relationship, b.from_id, b.order))
        });
        edges
    }

    /// Edges whose endpoints are missing or of the wrong kind.
    pub fn dangling_edges(&self) -> Vec<Edge> {
        let live: HashMap<EntityId, EntityKind> = self
            .state()
            .entities
            .iter()
            .map(|e| (e.id, e.kind))
            .collect();

        self.edges()
            .into_iter()
            .filter(|edge| match catalog::find(&edge.relationship) {
                Ok(t) => {
                    live.get(&edge.from_id) != Some(&t.from) || live.get(&edge.to_id) != Some(&t.to)
                }
                Err(_) => true,
            })
            .collect()
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.state().ops.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create_entity(&self, entity: NewEntity) -> Result<EntityId, StoreError> {
        let mut state = self.state();
        let attempt = state.create_attempts;
        state.create_attempts += 1;
        if state.failing_creates.contains(&attempt) {
            return Err(StoreError::Rejected(format!(
                "create attempt {attempt} for {}",
                entity.kind
            )));
        }

        let id = EntityId::new();
        state.entities.push(Entity {
            id,
            kind: entity.kind,
            attributes: entity.attributes,
            status: entity.status,
            created_at: Utc::now(),
        });
        state.ops.push(StoreOp::CreateEntity {
            kind: entity.kind,
            id,
        });
        Ok(id)
    }

    async fn delete_entity(&self, id: &EntityId, force: bool) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.failing_deletes.contains(id) {
            return Err(StoreError::Rejected(format!("delete of {id}")));
        }
        let Some(pos) = state.entities.iter().position(|e| &e.id == id) else {
            return Err(StoreError::NotFound { id: id.to_string() });
        };

        if force {
            let removed = state.entities.remove(pos);
            // Only edge sets of types pointing at this kind can hold it as a target.
            let incoming: HashSet<&str> = catalog::incoming(removed.kind).map(|t| t.name).collect();
            state.edges.retain(|(relationship, from_id), to_ids| {
                if incoming.contains(relationship.as_str()) {
                    to_ids.retain(|to| to != id);
                }
                from_id != id && !to_ids.is_empty()
            });
            state.labels.retain(|(entity, _), _| entity != id);
        } else {
            state.entities[pos].status = EntityStatus::Trash;
        }
        state.ops.push(StoreOp::DeleteEntity { id: *id, force });
        Ok(())
    }

    async fn entity_ids(&self, kind: EntityKind) -> Result<Vec<EntityId>, StoreError> {
        Ok(self
            .state()
            .entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect())
    }
}

#[async_trait]
impl TaxonomyStore for MemoryStore {
    async fn ensure_terms(&self, vocabulary: &str, terms: &[Term]) -> Result<(), StoreError> {
        let mut state = self.state();
        let existing = state.terms.entry(vocabulary.to_string()).or_default();
        for term in terms {
            if !existing.iter().any(|t| t.slug == term.slug) {
                existing.push(term.clone());
            }
        }
        Ok(())
    }

    async fn attach_term(
        &self,
        entity: &EntityId,
        vocabulary: &str,
        slug: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.entity(entity).is_none() {
            return Err(StoreError::NotFound {
                id: entity.to_string(),
            });
        }

        let terms = state.terms.entry(vocabulary.to_string()).or_default();
        if !terms.iter().any(|t| t.slug == slug) {
            terms.push(Term {
                slug: slug.to_string(),
                name: slug.to_string(),
            });
        }
        state
            .labels
            .insert((*entity, vocabulary.to_string()), slug.to_string());
        state.ops.push(StoreOp::AttachTerm {
            id: *entity,
            vocabulary: vocabulary.to_string(),
            slug: slug.to_string(),
        });
        Ok(())
    }

    async fn delete_all_terms(&self, vocabulary: &str) -> Result<usize, StoreError> {
        let mut state = self.state();
        let removed = state.terms.remove(vocabulary).map_or(0, |t| t.len());
        state.labels.retain(|(_, vocab), _| vocab != vocabulary);
        state.ops.push(StoreOp::DeleteAllTerms {
            vocabulary: vocabulary.to_string(),
        });
        Ok(removed)
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn register_relationship(
        &self,
        definition: &RelationshipType,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.registered.insert(definition.name.to_string());
        state.ops.push(StoreOp::RegisterRelationship {
            name: definition.name.to_string(),
        });
        Ok(())
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

        if !self.state().registered.contains(name) {
            return Err(undefined());
        }
        match catalog::find(name) {
            Ok(t) if t.from == from && t.to == to => Ok(RelationshipHandle::new(t)),
            _ => Err(undefined()),
        }
    }

    async fn replace_edges(
        &self,
        handle: &RelationshipHandle,
        from_id: &EntityId,
        to_ids: &[EntityId],
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.failing_replaces.contains(from_id) {
            return Err(StoreError::Rejected(format!(
                "replace {} edges of {from_id}",
                handle.name()
            )));
        }
        state.expect_kind(from_id, handle.from_kind())?;
        for to in to_ids {
            state.expect_kind(to, handle.to_kind())?;
        }

        let key = (handle.name().to_string(), *from_id);
        if to_ids.is_empty() {
            state.edges.remove(&key);
        } else {
            state.edges.insert(key, to_ids.to_vec());
        }
        state.ops.push(StoreOp::ReplaceEdges {
            relationship: handle.name().to_string(),
            from_id: *from_id,
            to_ids: to_ids.to_vec(),
        });
        Ok(())
    }

    async fn outgoing_edges(
        &self,
        handle: &RelationshipHandle,
        from_id: &EntityId,
    ) -> Result<Vec<EntityId>, StoreError> {
        Ok(self.targets(handle.name(), from_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Relationships, UNIVERSITY_TO_CITY};

    async fn create(store: &MemoryStore, kind: EntityKind) -> EntityId {
        store
            .create_entity(NewEntity::published(kind, "t", "c"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn resolve_requires_registration() {
        let store = MemoryStore::new();
        let err = Relationships::resolve(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::RelationshipUndefined { .. }));

        store.register_relationship(&UNIVERSITY_TO_CITY).await.unwrap();
        assert!(store
            .resolve(EntityKind::University, EntityKind::City, "university_to_city")
            .await
            .is_ok());
        // Registered name, wrong endpoints.
        assert!(store
            .resolve(EntityKind::City, EntityKind::University, "university_to_city")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn replace_edges_overwrites_previous_set() {
        let store = MemoryStore::with_schema();
        let rels = Relationships::resolve(&store).await.unwrap();
        let handle = rels.get("university_to_city").unwrap();

        let uni = create(&store, EntityKind::University).await;
        let a = create(&store, EntityKind::City).await;
        let b = create(&store, EntityKind::City).await;

        store.replace_edges(handle, &uni, &[a, b]).await.unwrap();
        store.replace_edges(handle, &uni, &[b]).await.unwrap();
        assert_eq!(store.targets("university_to_city", &uni), vec![b]);

        store.replace_edges(handle, &uni, &[]).await.unwrap();
        assert!(store.edges().is_empty());
    }

    #[tokio::test]
    async fn replace_edges_rejects_wrong_kind() {
        let store = MemoryStore::with_schema();
        let rels = Relationships::resolve(&store).await.unwrap();
        let handle = rels.get("university_to_city").unwrap();

        let uni = create(&store, EntityKind::University).await;
        let person = create(&store, EntityKind::Person).await;

        let err = store.replace_edges(handle, &uni, &[person]).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidEndpoint {
                expected: EntityKind::City,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn forced_delete_drops_incoming_edges() {
        let store = MemoryStore::with_schema();
        let rels = Relationships::resolve(&store).await.unwrap();
        let handle = rels.get("university_to_city").unwrap();

        let uni = create(&store, EntityKind::University).await;
        let city = create(&store, EntityKind::City).await;
        store.replace_edges(handle, &uni, &[city]).await.unwrap();

        store.delete_entity(&city, true).await.unwrap();
        assert!(store.edges().is_empty());
        assert!(store.dangling_edges().is_empty());
    }

    #[tokio::test]
    async fn forced_delete_detaches_every_incoming_type() {
        let store = MemoryStore::with_schema();
        let rels = Relationships::resolve(&store).await.unwrap();

        let uni = create(&store, EntityKind::University).await;
        let campus = create(&store, EntityKind::Campus).await;
        let course = create(&store, EntityKind::Course).await;
        let city = create(&store, EntityKind::City).await;
        let person = create(&store, EntityKind::Person).await;
        let other = create(&store, EntityKind::Person).await;

        let handle = |name: &str| rels.get(name).unwrap().clone();
        store
            .replace_edges(&handle("university_to_person"), &uni, &[person, other])
            .await
            .unwrap();
        store
            .replace_edges(&handle("campus_to_person"), &campus, &[person])
            .await
            .unwrap();
        store
            .replace_edges(&handle("course_to_person"), &course, &[other, person])
            .await
            .unwrap();
        store
            .replace_edges(&handle("university_to_city"), &uni, &[city])
            .await
            .unwrap();

        store.delete_entity(&person, true).await.unwrap();

        assert_eq!(store.targets("university_to_person", &uni), vec![other]);
        assert!(store.targets("campus_to_person", &campus).is_empty());
        assert_eq!(store.targets("course_to_person", &course), vec![other]);
        assert_eq!(store.targets("university_to_city", &uni), vec![city]);
        assert!(store.dangling_edges().is_empty());
    }

    #[tokio::test]
    async fn soft_delete_moves_to_trash() {
        let store = MemoryStore::new();
        let id = create(&store, EntityKind::Course).await;

        store.delete_entity(&id, false).await.unwrap();
        assert_eq!(store.entity(&id).unwrap().status, EntityStatus::Trash);
        // Trashed entities are still listed.
        assert_eq!(store.entity_ids(EntityKind::Course).await.unwrap(), vec![id]);
    }

    #[tokio::test]
    async fn attach_term_replaces_label_and_creates_term() {
        let store = MemoryStore::new();
        let id = create(&store, EntityKind::Person).await;

        store
            .attach_term(&id, PERSON_ROLE_VOCABULARY, "staff")
            .await
            .unwrap();
        store
            .attach_term(&id, PERSON_ROLE_VOCABULARY, "student")
            .await
            .unwrap();

        assert_eq!(
            store.label(&id, PERSON_ROLE_VOCABULARY).as_deref(),
            Some("student")
        );
        assert_eq!(store.terms(PERSON_ROLE_VOCABULARY).len(), 2);
        assert_eq!(
            store.delete_all_terms(PERSON_ROLE_VOCABULARY).await.unwrap(),
            2
        );
        assert_eq!(store.label(&id, PERSON_ROLE_VOCABULARY), None);
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MemoryStore::new();
        store.fail_create_attempts([1]);

        let first = store
            .create_entity(NewEntity::published(EntityKind::City, "a", "a"))
            .await;
        let second = store
            .create_entity(NewEntity::published(EntityKind::City, "b", "b"))
            .await;
        assert!(first.is_ok());
        assert!(matches!(second, Err(StoreError::Rejected(_))));

        let id = first.unwrap();
        store.fail_delete(id);
        assert!(store.delete_entity(&id, true).await.is_err());
        assert_eq!(store.entity_count(), 1);
    }
}
