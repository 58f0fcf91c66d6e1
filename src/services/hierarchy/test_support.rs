use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::models::{Category, CategoryId};
use crate::services::store::{CategoryStore, InMemoryCatalogStore, StoreError};

pub fn category(id: CategoryId, name: &str, parent_id: Option<CategoryId>) -> Category {
    Category {
        id,
        name: name.to_string(),
        sap_name: None,
        image: None,
        published: true,
        parent_id,
    }
}

/// Wraps the in-memory store and counts round trips per operation.
pub struct CountingStore {
    inner: InMemoryCatalogStore,
    bulk_fetches: AtomicUsize,
    point_fetches: AtomicUsize,
    point_fetched_ids: std::sync::Mutex<Vec<CategoryId>>,
}

impl CountingStore {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            inner: InMemoryCatalogStore::new(categories, Vec::new()),
            bulk_fetches: AtomicUsize::new(0),
            point_fetches: AtomicUsize::new(0),
            point_fetched_ids: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn bulk_fetches(&self) -> usize {
        self.bulk_fetches.load(Ordering::SeqCst)
    }

    pub fn point_fetches(&self) -> usize {
        self.point_fetches.load(Ordering::SeqCst)
    }

    pub fn point_fetched_ids(&self) -> Vec<CategoryId> {
        self.point_fetched_ids.lock().unwrap().clone()
    }

    pub fn total_fetches(&self) -> usize {
        self.bulk_fetches() + self.point_fetches()
    }
}

#[async_trait]
impl CategoryStore for CountingStore {
    async fn fetch_roots(&self) -> Result<Vec<Category>, StoreError> {
        self.inner.fetch_roots().await
    }

    async fn fetch_children(&self, parent_id: CategoryId) -> Result<Vec<Category>, StoreError> {
        self.inner.fetch_children(parent_id).await
    }

    async fn fetch_by_ids_with_parent(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<Category>, StoreError> {
        self.bulk_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_by_ids_with_parent(ids).await
    }

    async fn fetch_by_id_with_parent(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, StoreError> {
        self.point_fetches.fetch_add(1, Ordering::SeqCst);
        self.point_fetched_ids.lock().unwrap().push(id);
        self.inner.fetch_by_id_with_parent(id).await
    }
}

/// A store whose backend is down.
pub struct UnavailableStore;

#[async_trait]
impl CategoryStore for UnavailableStore {
    async fn fetch_roots(&self) -> Result<Vec<Category>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn fetch_children(&self, _parent_id: CategoryId) -> Result<Vec<Category>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn fetch_by_ids_with_parent(
        &self,
        _ids: &[CategoryId],
    ) -> Result<Vec<Category>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn fetch_by_id_with_parent(
        &self,
        _id: CategoryId,
    ) -> Result<Option<Category>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Protection(1) > Hands(2) > Gloves(3) > {Nitrile(4), Leather(5)}
/// Protection(1) > Feet(6); Chemicals(7) is a separate root.
pub fn catalog_tree() -> Vec<Category> {
    vec![
        category(1, "Protection", None),
        category(2, "Hands", Some(1)),
        category(3, "Gloves", Some(2)),
        category(4, "Nitrile", Some(3)),
        category(5, "Leather", Some(3)),
        category(6, "Feet", Some(1)),
        category(7, "Chemicals", None),
    ]
}

pub fn ids(chain: &[Category]) -> Vec<CategoryId> {
    chain.iter().map(|c| c.id).collect()
}
