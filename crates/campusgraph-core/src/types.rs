//! Core domain types for the campus dataset.
//!
//! Entities are generic content items tagged with a kind; relationships
//! between them are described in [`crate::catalog`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Vocabulary holding the role labels attached to Person entities.
pub const PERSON_ROLE_VOCABULARY: &str = "person_role";

// ── Identity ──────────────────────────────────────────────────────

/// Opaque identifier for an entity in the content store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Kinds ─────────────────────────────────────────────────────────

/// The closed set of entity kinds in the dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    University,
    City,
    Person,
    Course,
    Campus,
}

impl EntityKind {
    /// Every kind, in teardown order.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::University,
        EntityKind::City,
        EntityKind::Person,
        EntityKind::Course,
        EntityKind::Campus,
    ];

    /// Lowercase identifier used in relationship names and config keys.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::University => "university",
            Self::City => "city",
            Self::Person => "person",
            Self::Course => "course",
            Self::Campus => "campus",
        }
    }

    /// Capitalized label, also used as the graph node label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::University => "University",
            Self::City => "City",
            Self::Person => "Person",
            Self::Course => "Course",
            Self::Campus => "Campus",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Self::University => "universities",
            Self::City => "cities",
            Self::Person => "people",
            Self::Course => "courses",
            Self::Campus => "campuses",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.slug().eq_ignore_ascii_case(s) || k.plural().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownKind(s.to_string()))
    }
}

/// Publication state of an entity. Queries by kind see every status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    Publish,
    Trash,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Trash => "trash",
        }
    }
}

// ── Entities ──────────────────────────────────────────────────────

/// Display fields shared by every kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityAttributes {
    pub title: String,
    pub content: String,
}

/// Creation request handed to a [`crate::ContentStore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewEntity {
    pub kind: EntityKind,
    pub attributes: EntityAttributes,
    pub status: EntityStatus,
}

impl NewEntity {
    pub fn published(kind: EntityKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            attributes: EntityAttributes {
                title: title.into(),
                content: content.into(),
            },
            status: EntityStatus::Publish,
        }
    }
}

/// A stored entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub attributes: EntityAttributes,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

// ── Classification ────────────────────────────────────────────────

/// Role label attached to every generated Person.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PersonRole {
    Professor,
    Staff,
    Student,
    TeachingAssistant,
    Researcher,
}

impl PersonRole {
    pub const ALL: [PersonRole; 5] = [
        PersonRole::Professor,
        PersonRole::Staff,
        PersonRole::Student,
        PersonRole::TeachingAssistant,
        PersonRole::Researcher,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Professor => "professor",
            Self::Staff => "staff",
            Self::Student => "student",
            Self::TeachingAssistant => "teaching-assistant",
            Self::Researcher => "researcher",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Professor => "Professor",
            Self::Staff => "Staff",
            Self::Student => "Student",
            Self::TeachingAssistant => "Teaching Assistant",
            Self::Researcher => "Researcher",
        }
    }

    pub fn term(&self) -> Term {
        Term {
            slug: self.slug().to_string(),
            name: self.display_name().to_string(),
        }
    }

    /// The default terms of [`PERSON_ROLE_VOCABULARY`].
    pub fn default_terms() -> Vec<Term> {
        Self::ALL.iter().map(PersonRole::term).collect()
    }
}

impl FromStr for PersonRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonRole::ALL
            .into_iter()
            .find(|r| r.slug() == s)
            .ok_or_else(|| CoreError::UnknownRole(s.to_string()))
    }
}

/// A vocabulary term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Term {
    pub slug: String,
    pub name: String,
}

// ── Edges ─────────────────────────────────────────────────────────

/// A live relationship edge. `order` is the position of `to_id` in the
/// target list it was written with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub relationship: String,
    pub from_id: EntityId,
    pub to_id: EntityId,
    pub order: usize,
}
