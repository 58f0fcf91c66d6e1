use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use super::{Chain, Memo};
use crate::models::{Category, CategoryId};
use crate::services::store::{CategoryStore, StoreError};
use crate::utils::constant::MAX_CHAIN_DEPTH;

/// Walks a category up to its root through the parent references.
pub struct ChainResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CategoryStore + ?Sized> ChainResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Builds the chain `start -> parent -> ... -> root`.
    ///
    /// Parents are looked up in `memo` first and point fetched otherwise;
    /// every fetched parent is written back to `memo`. The walk ends at a
    /// root, at a parent id the store does not know, or when the data turns
    /// out to be cyclic or deeper than [`MAX_CHAIN_DEPTH`].
    ///
    /// # Errors
    ///
    /// Only store failures are returned. Missing data shortens the chain.
    #[instrument(skip_all, fields(start_id = start.id))]
    pub async fn resolve_chain(
        &self,
        start: &Category,
        memo: &mut Memo,
    ) -> Result<Chain, StoreError> {
        let mut chain = vec![start.clone()];
        let mut visited = HashSet::from([start.id]);
        let mut next_parent = start.parent_id;

        while let Some(parent_id) = next_parent {
            if !visited.insert(parent_id) {
                warn!(
                    category_id = parent_id,
                    "Cycle in category parent references, truncating chain"
                );
                break;
            }
            if chain.len() >= MAX_CHAIN_DEPTH {
                warn!(
                    category_id = parent_id,
                    depth = chain.len(),
                    "Category chain exceeds maximum depth, truncating chain"
                );
                break;
            }

            let Some(parent) = self.lookup(parent_id, memo).await? else {
                debug!(parent_id, "Dangling parent reference, chain ends here");
                break;
            };

            next_parent = parent.parent_id;
            chain.push(parent);
        }

        debug!(length = chain.len(), "Resolved category chain");
        Ok(chain)
    }

    async fn lookup(
        &self,
        id: CategoryId,
        memo: &mut Memo,
    ) -> Result<Option<Category>, StoreError> {
        if let Some(hit) = memo.get(id) {
            return Ok(Some(hit.clone()));
        }
        if memo.is_missing(id) {
            return Ok(None);
        }

        match self.store.fetch_by_id_with_parent(id).await? {
            Some(fetched) => {
                memo.insert(fetched.clone());
                Ok(Some(fetched))
            }
            None => {
                memo.mark_missing(id);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        CountingStore, UnavailableStore, catalog_tree, category, ids,
    };
    use super::*;

    #[test_log::test(tokio::test)]
    async fn walks_leaf_to_root() {
        let store = CountingStore::new(catalog_tree());
        let mut memo = Memo::new();
        let start = category(4, "Nitrile", Some(3));

        let chain = ChainResolver::new(&store)
            .resolve_chain(&start, &mut memo)
            .await
            .unwrap();

        assert_eq!(ids(&chain), vec![4, 3, 2, 1]);
        assert_eq!(store.point_fetches(), 3);
        assert_eq!(memo.len(), 3);
    }

    #[test_log::test(tokio::test)]
    async fn root_start_needs_no_store_access() {
        let store = CountingStore::new(catalog_tree());
        let mut memo = Memo::new();

        let chain = ChainResolver::new(&store)
            .resolve_chain(&category(7, "Chemicals", None), &mut memo)
            .await
            .unwrap();

        assert_eq!(ids(&chain), vec![7]);
        assert_eq!(store.total_fetches(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn memo_hits_skip_the_store() {
        let store = CountingStore::new(catalog_tree());
        let mut memo = Memo::new();
        memo.insert(category(3, "Gloves", Some(2)));
        memo.insert(category(2, "Hands", Some(1)));

        let chain = ChainResolver::new(&store)
            .resolve_chain(&category(5, "Leather", Some(3)), &mut memo)
            .await
            .unwrap();

        assert_eq!(ids(&chain), vec![5, 3, 2, 1]);
        assert_eq!(store.point_fetched_ids(), vec![1]);
    }

    #[test_log::test(tokio::test)]
    async fn dangling_parent_truncates_chain() {
        let store = CountingStore::new(vec![
            category(1, "Orphan", Some(99)),
            category(2, "Child", Some(1)),
        ]);
        let mut memo = Memo::new();
        let resolver = ChainResolver::new(&store);

        let chain = resolver
            .resolve_chain(&category(2, "Child", Some(1)), &mut memo)
            .await
            .unwrap();
        assert_eq!(ids(&chain), vec![2, 1]);
        assert!(memo.is_missing(99));

        // The unknown parent is not looked up a second time.
        let again = resolver
            .resolve_chain(&category(1, "Orphan", Some(99)), &mut memo)
            .await
            .unwrap();
        assert_eq!(ids(&again), vec![1]);
        assert_eq!(store.point_fetched_ids(), vec![1, 99]);
    }

    #[test_log::test(tokio::test)]
    async fn cyclic_parents_terminate_without_duplicates() {
        let store = CountingStore::new(vec![
            category(1, "A", Some(3)),
            category(2, "B", Some(1)),
            category(3, "C", Some(2)),
        ]);
        let mut memo = Memo::new();

        let chain = ChainResolver::new(&store)
            .resolve_chain(&category(1, "A", Some(3)), &mut memo)
            .await
            .unwrap();

        assert_eq!(ids(&chain), vec![1, 3, 2]);
    }

    #[test_log::test(tokio::test)]
    async fn self_parent_terminates() {
        let store = CountingStore::new(vec![category(1, "Loop", Some(1))]);
        let mut memo = Memo::new();

        let chain = ChainResolver::new(&store)
            .resolve_chain(&category(1, "Loop", Some(1)), &mut memo)
            .await
            .unwrap();

        assert_eq!(ids(&chain), vec![1]);
        assert_eq!(store.total_fetches(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn overly_deep_chain_is_capped() {
        let depth = MAX_CHAIN_DEPTH as i32 + 10;
        let tree: Vec<_> = (1..=depth)
            .map(|id| category(id, "Level", (id > 1).then_some(id - 1)))
            .collect();
        let store = CountingStore::new(tree);
        let mut memo = Memo::new();

        let chain = ChainResolver::new(&store)
            .resolve_chain(&category(depth, "Level", Some(depth - 1)), &mut memo)
            .await
            .unwrap();

        assert_eq!(chain.len(), MAX_CHAIN_DEPTH);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let mut memo = Memo::new();
        let result = ChainResolver::new(&UnavailableStore)
            .resolve_chain(&category(2, "Child", Some(1)), &mut memo)
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
