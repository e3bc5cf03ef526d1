//! Error types for the campusgraph-seed crate.

use campusgraph_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Relationship types are not registered; run `register` first: {0}")]
    RelationshipsUnavailable(#[source] StoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, SeedError>;
