//! # Category Hierarchy Resolution
//!
//! Rebuilds ancestor chains from the parent-pointer tree held by a
//! [`CategoryStore`](crate::services::store::CategoryStore) and merges them
//! into one duplicate-free, first-seen ordered list.
//!
//! - [`ChainResolver`] - walks one category up to its root
//! - [`BatchResolver`] - resolves many chains sharing a single [`Memo`]
//! - [`HierarchyService`] - the three public entry points and [`merge`]
//!
//! Nothing here outlives a call: every resolution builds its own [`Memo`].

mod aggregate;
mod batch;
mod chain;
#[cfg(test)]
mod test_support;

use std::collections::{HashMap, HashSet};

use crate::models::{Category, CategoryId};

pub use aggregate::{HierarchyService, merge};
pub use batch::BatchResolver;
pub use chain::ChainResolver;

/// A category followed by its ancestors, leaf first, root last.
pub type Chain = Vec<Category>;

/// Categories already read during one resolution call, keyed by id.
///
/// Ids the store reported as unknown are remembered too, so a dangling
/// parent shared by several chains costs a single lookup.
#[derive(Debug, Default)]
pub struct Memo {
    nodes: HashMap<CategoryId, Category>,
    missing: HashSet<CategoryId>,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.nodes.get(&id)
    }

    pub fn insert(&mut self, category: Category) {
        self.missing.remove(&category.id);
        self.nodes.insert(category.id, category);
    }

    pub fn mark_missing(&mut self, id: CategoryId) {
        if !self.nodes.contains_key(&id) {
            self.missing.insert(id);
        }
    }

    pub fn is_missing(&self, id: CategoryId) -> bool {
        self.missing.contains(&id)
    }

    /// True when the id needs no further store access.
    pub fn is_settled(&self, id: CategoryId) -> bool {
        self.nodes.contains_key(&id) || self.missing.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Extend<Category> for Memo {
    fn extend<I: IntoIterator<Item = Category>>(&mut self, iter: I) {
        for category in iter {
            self.insert(category);
        }
    }
}
