use thiserror::Error;

use crate::types::EntityKind;

/// Errors from parsing or validating domain values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("Unknown person role: {0}")]
    UnknownRole(String),

    #[error("Unknown relationship type: {0}")]
    UnknownRelationship(String),
}

/// Errors surfaced by any store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Entity not found: {id}")]
    NotFound { id: String },

    #[error("Relationship type not registered: {name} ({from} -> {to})")]
    RelationshipUndefined {
        name: String,
        from: EntityKind,
        to: EntityKind,
    },

    #[error("Edge endpoint {id} is not a live {expected} entity")]
    InvalidEndpoint { id: String, expected: EntityKind },

    #[error("Rejected by store: {0}")]
    Rejected(String),

    #[error("Backend error ({backend}): {source}")]
    Backend {
        backend: String,
        #[source]
        source: anyhow::Error,
    },
}
