//! Entity generation.

use rand::Rng;

use campusgraph_core::{
    ContentStore, EntityId, EntityKind, NewEntity, TaxonomyStore, PERSON_ROLE_VOCABULARY,
};

use crate::names;

/// Creates batches of entities with generated display text.
pub struct EntityGenerator<'s, S: ?Sized> {
    store: &'s S,
}

impl<'s, S> EntityGenerator<'s, S>
where
    S: ContentStore + TaxonomyStore + ?Sized,
{
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Create up to `count` published entities of `kind`.
    ///
    /// A failed create is logged and skipped, so the result may be shorter
    /// than `count`. Each person gets one random role; if attaching it fails
    /// the person is kept unlabeled.
    pub async fn generate<R: Rng>(
        &self,
        rng: &mut R,
        kind: EntityKind,
        count: usize,
    ) -> Vec<EntityId> {
        let mut ids = Vec::with_capacity(count);

        for index in 0..count {
            let (title, content) = names::compose(kind, index, rng);
            let id = match self
                .store
                .create_entity(NewEntity::published(kind, title.as_str(), content))
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(kind = %kind, index, error = %e, "Failed to create entity");
                    continue;
                }
            };

            if kind == EntityKind::Person {
                let role = names::random_role(rng);
                if let Err(e) = self
                    .store
                    .attach_term(&id, PERSON_ROLE_VOCABULARY, role.slug())
                    .await
                {
                    tracing::warn!(
                        id = %id,
                        role = role.slug(),
                        error = %e,
                        "Failed to attach person role"
                    );
                }
            }

            tracing::debug!(kind = %kind, id = %id, title = %title, "Created entity");
            ids.push(id);
        }

        tracing::info!(kind = %kind, requested = count, created = ids.len(), "Generated entities");
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusgraph_core::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn zero_count_creates_nothing() {
        let store = MemoryStore::with_schema();
        let mut rng = StdRng::seed_from_u64(0);
        let ids = EntityGenerator::new(&store)
            .generate(&mut rng, EntityKind::Course, 0)
            .await;
        assert!(ids.is_empty());
        assert_eq!(store.entity_count(), 0);
    }

    #[tokio::test]
    async fn failed_creates_are_skipped() {
        let store = MemoryStore::with_schema();
        store.fail_create_attempts([1, 3]);
        let mut rng = StdRng::seed_from_u64(0);
        let ids = EntityGenerator::new(&store)
            .generate(&mut rng, EntityKind::City, 5)
            .await;
        assert_eq!(ids.len(), 3);
        assert_eq!(store.entities(EntityKind::City).len(), 3);
    }

    #[tokio::test]
    async fn people_get_exactly_one_role() {
        let store = MemoryStore::with_schema();
        let mut rng = StdRng::seed_from_u64(4);
        let ids = EntityGenerator::new(&store)
            .generate(&mut rng, EntityKind::Person, 8)
            .await;
        for id in &ids {
            let slug = store.label(id, PERSON_ROLE_VOCABULARY).unwrap();
            assert!(campusgraph_core::PersonRole::ALL
                .iter()
                .any(|r| r.slug() == slug));
        }
    }
}
