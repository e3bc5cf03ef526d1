//! Random wiring of generated entities through the relationship catalog.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use campusgraph_core::catalog;
use campusgraph_core::{
    DegreeRange, EntityId, EntityKind, RelationshipHandle, RelationshipStore, Relationships,
    StoreError,
};

use crate::report::BuildReport;

/// Generated ids grouped by kind.
#[derive(Debug, Clone, Default)]
pub struct EntityPools {
    pools: BTreeMap<EntityKind, Vec<EntityId>>,
}

impl EntityPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: EntityKind, ids: Vec<EntityId>) {
        self.pools.insert(kind, ids);
    }

    /// Ids of `kind`; empty when none were generated.
    pub fn get(&self, kind: EntityKind) -> &[EntityId] {
        self.pools.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Draw `k` distinct ids from `pool`, with `k` uniform in `degree` and then
/// capped at the pool size.
pub fn sample<R: Rng>(rng: &mut R, degree: DegreeRange, pool: &[EntityId]) -> Vec<EntityId> {
    let k = rng.gen_range(degree.as_range()).min(pool.len());
    pool.choose_multiple(rng, k).copied().collect()
}

/// Replaces outgoing edge sets for every source entity.
pub struct GraphBuilder<'s, S: ?Sized> {
    store: &'s S,
    relationships: Relationships,
}

impl<'s, S> GraphBuilder<'s, S>
where
    S: RelationshipStore + ?Sized,
{
    /// Resolve the catalog against `store`. Fails if any type is missing.
    pub async fn new(store: &'s S) -> Result<Self, StoreError> {
        let relationships = Relationships::resolve(store).await?;
        Ok(Self::with_relationships(store, relationships))
    }

    pub fn with_relationships(store: &'s S, relationships: Relationships) -> Self {
        Self {
            store,
            relationships,
        }
    }

    /// Replace the outgoing edges of `from_id` under `handle` with `to_ids`.
    ///
    /// Duplicates are dropped keeping the first occurrence. Returns the
    /// number of edges written.
    pub async fn connect(
        &self,
        handle: &RelationshipHandle,
        from_id: &EntityId,
        to_ids: &[EntityId],
    ) -> Result<usize, StoreError> {
        let mut seen = HashSet::with_capacity(to_ids.len());
        let targets: Vec<EntityId> = to_ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        self.store.replace_edges(handle, from_id, &targets).await?;
        Ok(targets.len())
    }

    /// Connect every entity of each source kind through each of its
    /// outgoing relationship types.
    ///
    /// A failed `connect` is logged and counted; the build carries on.
    pub async fn build<R: Rng>(&self, rng: &mut R, pools: &EntityPools) -> BuildReport {
        let mut report = BuildReport::default();

        for kind in catalog::source_kinds() {
            let handles: Vec<&RelationshipHandle> = self.relationships.outgoing(kind).collect();
            for from_id in pools.get(kind) {
                let mut ok = true;
                for handle in &handles {
                    let definition = handle.definition();
                    let targets = sample(rng, definition.degree, pools.get(definition.to));
                    match self.connect(handle, from_id, &targets).await {
                        Ok(n) => report.record(handle.name(), n),
                        Err(e) => {
                            ok = false;
                            report.failed += 1;
                            tracing::warn!(
                                relationship = handle.name(),
                                from_id = %from_id,
                                error = %e,
                                "Failed to connect entity"
                            );
                        }
                    }
                }
                if ok {
                    report.sources_connected += 1;
                }
            }
            tracing::info!(kind = %kind, sources = pools.get(kind).len(), "Connected source kind");
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ids(n: usize) -> Vec<EntityId> {
        (0..n).map(|_| EntityId::new()).collect()
    }

    #[test]
    fn sample_respects_degree_and_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool = ids(10);
        for _ in 0..200 {
            let picked = sample(&mut rng, DegreeRange::new(3, 7), &pool);
            assert!((3..=7).contains(&picked.len()));
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), picked.len());
            assert!(picked.iter().all(|id| pool.contains(id)));
        }
    }

    #[test]
    fn sample_clamps_to_small_pool() {
        let mut rng = StdRng::seed_from_u64(2);
        let pool = ids(2);
        for _ in 0..50 {
            assert_eq!(sample(&mut rng, DegreeRange::new(5, 10), &pool).len(), 2);
        }
    }

    #[test]
    fn short_pool_caps_the_drawn_degree() {
        // Draws of 4..=7 all cap to the full pool of 4, so it is picked
        // four times out of five.
        let mut rng = StdRng::seed_from_u64(1);
        let pool = ids(4);
        let trials = 10_000;
        let mut sizes = [0usize; 5];
        for _ in 0..trials {
            sizes[sample(&mut rng, DegreeRange::new(3, 7), &pool).len()] += 1;
        }
        assert_eq!(sizes[0] + sizes[1] + sizes[2], 0);
        let full = sizes[4] as f64 / trials as f64;
        assert!((0.77..=0.83).contains(&full), "P(|S| = 4) = {full}");
    }

    #[test]
    fn sample_empty_pool_is_empty() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(sample(&mut rng, DegreeRange::new(1, 3), &[]).is_empty());
    }

    #[test]
    fn pools_default_to_empty() {
        let mut pools = EntityPools::new();
        pools.insert(EntityKind::City, ids(3));
        assert_eq!(pools.get(EntityKind::City).len(), 3);
        assert!(pools.get(EntityKind::Person).is_empty());
    }
}
