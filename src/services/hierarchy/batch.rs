use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use super::{Chain, ChainResolver, Memo};
use crate::models::CategoryId;
use crate::services::store::{CategoryStore, StoreError};
use crate::utils::constant::MAX_CHAIN_DEPTH;

/// Resolves the chains of many categories within one [`Memo`].
///
/// Start nodes are read in a single bulk fetch. Their ancestors are then
/// prefetched one tree level per round trip, so shared ancestors are read
/// once no matter how many chains pass through them.
pub struct BatchResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CategoryStore + ?Sized> BatchResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns the chain of every requested id the store knows about.
    ///
    /// Unknown ids have no entry in the result. An empty request performs
    /// no store access.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    #[instrument(skip_all, fields(requested = start_ids.len()))]
    pub async fn resolve_chains(
        &self,
        start_ids: &[CategoryId],
    ) -> Result<HashMap<CategoryId, Chain>, StoreError> {
        let start_ids = dedup(start_ids);
        if start_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut memo = Memo::new();
        memo.extend(self.store.fetch_by_ids_with_parent(&start_ids).await?);
        for &id in &start_ids {
            memo.mark_missing(id);
        }

        self.prefetch_ancestors(&start_ids, &mut memo).await?;

        let chain_resolver = ChainResolver::new(self.store);
        let mut chains = HashMap::with_capacity(start_ids.len());
        for &id in &start_ids {
            let Some(start) = memo.get(id).cloned() else {
                debug!(category_id = id, "Requested category not found, skipping");
                continue;
            };
            let chain = chain_resolver.resolve_chain(&start, &mut memo).await?;
            chains.insert(id, chain);
        }

        debug!(
            resolved = chains.len(),
            memo_size = memo.len(),
            "Resolved category chains"
        );
        Ok(chains)
    }

    /// Loads every ancestor of the memo's start nodes level by level.
    ///
    /// Each round fetches the parents of the previous round's nodes that the
    /// memo has not settled yet. Ids the store does not return are marked
    /// missing so the chain walk does not retry them.
    async fn prefetch_ancestors(
        &self,
        start_ids: &[CategoryId],
        memo: &mut Memo,
    ) -> Result<(), StoreError> {
        let mut frontier = unsettled_parents(
            start_ids.iter().filter_map(|id| memo.get(*id)).map(|c| c.parent_id),
            memo,
        );
        let mut rounds = 0;

        while !frontier.is_empty() {
            if rounds >= MAX_CHAIN_DEPTH {
                warn!(
                    pending = frontier.len(),
                    "Ancestor prefetch exceeded maximum depth, leaving the rest to the chain walk"
                );
                break;
            }
            rounds += 1;

            let fetched = self.store.fetch_by_ids_with_parent(&frontier).await?;
            debug!(
                round = rounds,
                requested = frontier.len(),
                found = fetched.len(),
                "Prefetched ancestor level"
            );

            let next_parents: Vec<_> = fetched.iter().map(|c| c.parent_id).collect();
            memo.extend(fetched);
            for &id in &frontier {
                memo.mark_missing(id);
            }
            frontier = unsettled_parents(next_parents, memo);
        }

        Ok(())
    }
}

/// Parent ids not yet in the memo, first-seen order, no repeats.
fn unsettled_parents(
    parents: impl IntoIterator<Item = Option<CategoryId>>,
    memo: &Memo,
) -> Vec<CategoryId> {
    let mut seen = HashSet::new();
    parents
        .into_iter()
        .flatten()
        .filter(|id| !memo.is_settled(*id) && seen.insert(*id))
        .collect()
}

fn dedup(ids: &[CategoryId]) -> Vec<CategoryId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
