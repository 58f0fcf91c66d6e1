use std::collections::HashSet;

use tracing::{debug, instrument};

use super::{BatchResolver, Chain, ChainResolver, Memo};
use crate::models::{Category, CategoryId, TaggedEntity};
use crate::services::store::{CategoryStore, StoreError};

/// Flattens chains into one list, keeping the first occurrence of every id.
///
/// Chains are consumed in order and each chain leaf to root. A category that
/// shows up again later is dropped, never moved.
pub fn merge<'c, I>(chains: I) -> Vec<Category>
where
    I: IntoIterator<Item = &'c [Category]>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for chain in chains {
        for category in chain {
            if seen.insert(category.id) {
                merged.push(category.clone());
            }
        }
    }

    merged
}

/// Entry points for resolving category hierarchies.
///
/// The service is a thin borrow of a store; it keeps no state between calls.
pub struct HierarchyService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CategoryStore + ?Sized> HierarchyService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The chain of a single category, leaf to root.
    #[instrument(skip_all, fields(category_id = category.id))]
    pub async fn resolve_for_one_category(
        &self,
        category: &Category,
    ) -> Result<Chain, StoreError> {
        let mut memo = Memo::new();
        ChainResolver::new(self.store)
            .resolve_chain(category, &mut memo)
            .await
    }

    /// Merged chains of `categories`, in the order given.
    pub async fn resolve_for_categories(
        &self,
        categories: &[Category],
    ) -> Result<Vec<Category>, StoreError> {
        let ids: Vec<_> = categories.iter().map(|c| c.id).collect();
        self.resolve_for_category_ids(&ids).await
    }

    /// Merged chains of the categories behind `ids`. Unknown ids are skipped.
    #[instrument(skip_all, fields(requested = ids.len()))]
    pub async fn resolve_for_category_ids(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<Category>, StoreError> {
        self.resolve_ordered(ids).await
    }

    /// Union of the chains of every category tagged on `entities`.
    ///
    /// Tags are taken entity by entity, each entity's tags in their own order,
    /// and that first-encountered order drives the merge.
    #[instrument(skip_all, fields(entities = entities.len()))]
    pub async fn resolve_for_entities<E: TaggedEntity + Sync>(
        &self,
        entities: &[E],
    ) -> Result<Vec<Category>, StoreError> {
        let mut seen = HashSet::new();
        let ids: Vec<_> = entities
            .iter()
            .flat_map(|entity| entity.category_ids().iter().copied())
            .filter(|id| seen.insert(*id))
            .collect();

        debug!(tags = ids.len(), "Collected entity category tags");
        self.resolve_ordered(&ids).await
    }

    async fn resolve_ordered(&self, ids: &[CategoryId]) -> Result<Vec<Category>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let chains = BatchResolver::new(self.store).resolve_chains(ids).await?;
        let merged = merge(
            ids.iter()
                .filter_map(|id| chains.get(id))
                .map(Vec::as_slice),
        );

        debug!(merged = merged.len(), "Merged category chains");
        Ok(merged)
    }
}
