//! campusgraph-seed: Seeds and tears down the campus relationship dataset.
//!
//! Generates universities, cities, people, courses and campuses, wires them
//! together through the six catalog relationship types with randomized
//! degrees, and later removes every entity together with its edges and the
//! person role vocabulary.
//!
//! Every top-level operation resolves the relationship catalog against the
//! store first and aborts with [`SeedError::RelationshipsUnavailable`]
//! before touching anything if a type is not registered.

pub mod builder;
pub mod config;
pub mod error;
pub mod generator;
pub mod names;
pub mod report;
pub mod teardown;

use rand::Rng;

use campusgraph_core::catalog::CATALOG;
use campusgraph_core::{
    EntityKind, PersonRole, Relationships, SeedStore, PERSON_ROLE_VOCABULARY,
};

pub use builder::{EntityPools, GraphBuilder};
pub use config::DatasetCounts;
pub use error::{Result, SeedError};
pub use generator::EntityGenerator;
pub use report::{BuildReport, GenerateReport, KindCreated, KindPurge, PurgeReport};
pub use teardown::TeardownManager;

async fn resolve_relationships<S: SeedStore + ?Sized>(store: &S) -> Result<Relationships> {
    Relationships::resolve(store)
        .await
        .map_err(SeedError::RelationshipsUnavailable)
}

/// Declare the six relationship types and the person role vocabulary.
/// Safe to run repeatedly.
pub async fn register_schema<S: SeedStore + ?Sized>(store: &S) -> Result<()> {
    for definition in &CATALOG {
        store.register_relationship(definition).await?;
        tracing::debug!(relationship = definition.name, "Registered relationship type");
    }
    store
        .ensure_terms(PERSON_ROLE_VOCABULARY, &PersonRole::default_terms())
        .await?;

    // Confirms the store now satisfies the precondition every other
    // operation checks.
    resolve_relationships(store).await?;
    tracing::info!(relationships = CATALOG.len(), "Registered schema");
    Ok(())
}

/// Generate `counts` entities of each kind and connect them.
pub async fn generate_dataset<S, R>(
    store: &S,
    counts: &DatasetCounts,
    rng: &mut R,
) -> Result<GenerateReport>
where
    S: SeedStore + ?Sized,
    R: Rng,
{
    let relationships = resolve_relationships(store).await?;

    let generator = EntityGenerator::new(store);
    let mut pools = EntityPools::new();
    let mut report = GenerateReport::default();

    for kind in EntityKind::ALL {
        let requested = counts.get(kind);
        let ids = generator.generate(rng, kind, requested).await;
        report.created.push(KindCreated {
            kind,
            requested,
            created: ids.len(),
        });
        pools.insert(kind, ids);
    }

    let builder = GraphBuilder::with_relationships(store, relationships);
    report.relationships = builder.build(rng, &pools).await;

    tracing::info!(
        entities = report.total_created(),
        edges = report.relationships.total_edges(),
        failed_connects = report.relationships.failed,
        "Dataset generated"
    );
    Ok(report)
}

/// Delete every generated entity, its edges, and the person role terms.
pub async fn purge_dataset<S: SeedStore + ?Sized>(store: &S) -> Result<PurgeReport> {
    let relationships = resolve_relationships(store).await?;
    let report = TeardownManager::with_relationships(store, relationships)
        .purge_all()
        .await?;

    tracing::info!(
        deleted = report.total_deleted(),
        failed = report.total_failed(),
        terms_removed = report.terms_removed,
        "Dataset purged"
    );
    Ok(report)
}
