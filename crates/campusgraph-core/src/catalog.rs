//! The fixed relationship catalog.
//!
//! Six relationship types connect the five entity kinds. Each type names its
//! `from` and `to` kinds and the inclusive range a source entity's out-degree
//! is sampled from. The catalog is static; a store must have every type
//! registered before [`Relationships::resolve`] succeeds.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, StoreError};
use crate::store::RelationshipStore;
use crate::types::EntityKind;

/// Declared cardinality. Informational: every type is sampled and stored
/// as many-to-many.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToMany,
    ManyToMany,
}

/// Inclusive out-degree range for a relationship type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DegreeRange {
    pub min: usize,
    pub max: usize,
}

impl DegreeRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn as_range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

/// A relationship type definition.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RelationshipType {
    pub name: &'static str,
    pub from: EntityKind,
    pub to: EntityKind,
    pub cardinality: Cardinality,
    pub degree: DegreeRange,
}

pub const UNIVERSITY_TO_CITY: RelationshipType = RelationshipType {
    name: "university_to_city",
    from: EntityKind::University,
    to: EntityKind::City,
    cardinality: Cardinality::ManyToMany,
    degree: DegreeRange::new(1, 3),
};

pub const UNIVERSITY_TO_CAMPUS: RelationshipType = RelationshipType {
    name: "university_to_campus",
    from: EntityKind::University,
    to: EntityKind::Campus,
    cardinality: Cardinality::OneToMany,
    degree: DegreeRange::new(1, 3),
};

pub const UNIVERSITY_TO_PERSON: RelationshipType = RelationshipType {
    name: "university_to_person",
    from: EntityKind::University,
    to: EntityKind::Person,
    cardinality: Cardinality::ManyToMany,
    degree: DegreeRange::new(5, 10),
};

pub const UNIVERSITY_TO_COURSE: RelationshipType = RelationshipType {
    name: "university_to_course",
    from: EntityKind::University,
    to: EntityKind::Course,
    cardinality: Cardinality::OneToMany,
    degree: DegreeRange::new(3, 7),
};

pub const CAMPUS_TO_PERSON: RelationshipType = RelationshipType {
    name: "campus_to_person",
    from: EntityKind::Campus,
    to: EntityKind::Person,
    cardinality: Cardinality::ManyToMany,
    degree: DegreeRange::new(3, 7),
};

pub const COURSE_TO_PERSON: RelationshipType = RelationshipType {
    name: "course_to_person",
    from: EntityKind::Course,
    to: EntityKind::Person,
    cardinality: Cardinality::ManyToMany,
    degree: DegreeRange::new(1, 3),
};

/// All relationship types, in build order.
pub const CATALOG: [RelationshipType; 6] = [
    UNIVERSITY_TO_CITY,
    UNIVERSITY_TO_CAMPUS,
    UNIVERSITY_TO_PERSON,
    UNIVERSITY_TO_COURSE,
    CAMPUS_TO_PERSON,
    COURSE_TO_PERSON,
];

/// Look up a definition by name.
pub fn find(name: &str) -> Result<&'static RelationshipType, CoreError> {
    CATALOG
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| CoreError::UnknownRelationship(name.to_string()))
}

/// Types for which `kind` is the `from` endpoint.
pub fn outgoing(kind: EntityKind) -> impl Iterator<Item = &'static RelationshipType> {
    CATALOG.iter().filter(move |t| t.from == kind)
}

/// Types for which `kind` is the `to` endpoint.
pub fn incoming(kind: EntityKind) -> impl Iterator<Item = &'static RelationshipType> {
    CATALOG.iter().filter(move |t| t.to == kind)
}

/// Kinds that own outgoing edges, in build order.
pub fn source_kinds() -> Vec<EntityKind> {
    let mut kinds = Vec::new();
    for t in &CATALOG {
        if !kinds.contains(&t.from) {
            kinds.push(t.from);
        }
    }
    kinds
}

// ── Resolved handles ──────────────────────────────────────────────

/// A relationship type confirmed to be registered in a store.
///
/// Only [`RelationshipStore::resolve`] implementations construct handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipHandle {
    definition: &'static RelationshipType,
}

impl RelationshipHandle {
    pub fn new(definition: &'static RelationshipType) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &'static RelationshipType {
        self.definition
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn from_kind(&self) -> EntityKind {
        self.definition.from
    }

    pub fn to_kind(&self) -> EntityKind {
        self.definition.to
    }
}

/// Every catalog type, resolved against one store.
#[derive(Debug, Clone)]
pub struct Relationships {
    handles: Vec<RelationshipHandle>,
}

impl Relationships {
    /// Resolve all six types. Fails on the first unregistered type, before
    /// the caller has mutated anything.
    pub async fn resolve<S>(store: &S) -> Result<Self, StoreError>
    where
        S: RelationshipStore + ?Sized,
    {
        let mut handles = Vec::with_capacity(CATALOG.len());
        for t in &CATALOG {
            handles.push(store.resolve(t.from, t.to, t.name).await?);
        }
        tracing::debug!(count = handles.len(), "Resolved relationship types");
        Ok(Self { handles })
    }

    pub fn get(&self, name: &str) -> Option<&RelationshipHandle> {
        self.handles.iter().find(|h| h.name() == name)
    }

    /// Handles for which `kind` is the `from` endpoint.
    pub fn outgoing(&self, kind: EntityKind) -> impl Iterator<Item = &RelationshipHandle> {
        self.handles.iter().filter(move |h| h.from_kind() == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelationshipHandle> {
        self.handles.iter()
    }
}
