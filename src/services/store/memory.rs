//! In-memory implementation of the catalog store.
//!
//! Loaded from a JSON seed (`{"categories": [...], "products": [...]}`) for
//! local runs without a database, and used as the store behind the test suite.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::{CategoryStore, ProductStore, StoreError};
use crate::models::{Category, CategoryId, Product, ProductId};
use crate::utils::constant::MAX_NAME_SUGGESTIONS;

#[derive(Debug, Default, Deserialize)]
struct Seed {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    categories: HashMap<CategoryId, Category>,
    products: Vec<Product>,
}

impl InMemoryCatalogStore {
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        let categories: HashMap<_, _> = categories
            .into_iter()
            .map(|mut category| {
                // `0` is the legacy root sentinel
                if category.parent_id == Some(0) {
                    category.parent_id = None;
                }
                (category.id, category)
            })
            .collect();

        info!(
            categories = categories.len(),
            products = products.len(),
            "Initialized in-memory catalog store"
        );

        Self {
            categories,
            products,
        }
    }

    /// Loads the store from a JSON seed document.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let seed: Seed = serde_json::from_str(content)?;
        Ok(Self::new(seed.categories, seed.products))
    }

    fn sorted_by_name(mut categories: Vec<Category>) -> Vec<Category> {
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        categories
    }

    fn products_by_name(mut products: Vec<Product>) -> Vec<Product> {
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        products
    }
}

#[async_trait]
impl CategoryStore for InMemoryCatalogStore {
    async fn fetch_roots(&self) -> Result<Vec<Category>, StoreError> {
        let roots = self
            .categories
            .values()
            .filter(|c| c.is_root())
            .cloned()
            .collect();
        Ok(Self::sorted_by_name(roots))
    }

    async fn fetch_children(&self, parent_id: CategoryId) -> Result<Vec<Category>, StoreError> {
        let children = self
            .categories
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        Ok(Self::sorted_by_name(children))
    }

    async fn fetch_by_ids_with_parent(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<Category>, StoreError> {
        let found: Vec<_> = ids
            .iter()
            .filter_map(|id| self.categories.get(id).cloned())
            .collect();
        debug!(requested = ids.len(), found = found.len(), "Bulk fetched categories");
        Ok(found)
    }

    async fn fetch_by_id_with_parent(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.get(&id).cloned())
    }
}

#[async_trait]
impl ProductStore for InMemoryCatalogStore {
    async fn fetch_products_with_categories(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, StoreError> {
        let mut seen = HashSet::with_capacity(ids.len());
        let products = ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.products.iter().find(|p| p.id == *id).cloned())
            .collect();
        Ok(products)
    }

    async fn fetch_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<_> = self
            .products
            .iter()
            .filter(|p| p.category_ids.contains(&category_id))
            .cloned()
            .collect();
        Ok(Self::products_by_name(products))
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>, StoreError> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<_> = self
            .products
            .iter()
            .filter(|p| p.matches_search(&needle))
            .cloned()
            .collect();
        debug!(found = found.len(), "Searched products");
        Ok(Self::products_by_name(found))
    }

    async fn product_name_suggestions(&self, term: &str) -> Result<Vec<String>, StoreError> {
        let needle = term.trim().to_lowercase();
        let names: BTreeSet<&str> = self
            .products
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| !name.trim().is_empty())
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .collect();

        Ok(names
            .into_iter()
            .take(MAX_NAME_SUGGESTIONS)
            .map(str::to_owned)
            .collect())
    }
}
