//! campusgraph-graph: Neo4j backend for the seeder.
//!
//! Entities are stored as `:Entity:<Kind>` nodes, relationship edges as typed
//! Neo4j relationships, and vocabulary terms as `:Term` nodes. Every node
//! carries a `dataset` property so independent datasets (and test runs) can
//! share one database without touching each other.

pub mod client;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
