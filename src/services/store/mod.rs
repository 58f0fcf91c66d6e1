//! # Catalog Store
//!
//! Read-only access to the category tree and the products tagged with it.
//! This is the only layer that touches durable storage; everything above it
//! works on snapshots handed out by these traits.
//!
//! ## Implementations
//!
//! - [`PgCatalogStore`] - PostgreSQL backed store used in production
//! - [`InMemoryCatalogStore`] - JSON seeded store for local runs and tests

mod memory;
mod pg;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Category, CategoryId, Product, ProductId};

pub use memory::InMemoryCatalogStore;
pub use pg::PgCatalogStore;

/// Failures of the backing store. Absence of data is never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Category lookups the hierarchy engine depends on.
///
/// Every returned [`Category`] carries its `parent_id`, so one level of the
/// parent relation is always available without another round trip.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Categories without a parent, ordered by name.
    async fn fetch_roots(&self) -> Result<Vec<Category>, StoreError>;

    /// Direct children of `parent_id`, ordered by name. The root sentinel `0`
    /// has no children.
    async fn fetch_children(&self, parent_id: CategoryId) -> Result<Vec<Category>, StoreError>;

    /// All categories whose id is in `ids`, in one round trip.
    ///
    /// Unknown ids are skipped. No ordering is guaranteed.
    async fn fetch_by_ids_with_parent(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<Category>, StoreError>;

    /// A single category, or `None` when the id is unknown.
    async fn fetch_by_id_with_parent(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, StoreError>;
}

/// Product lookups used by the catalog endpoints.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products whose id is in `ids`, in the order the ids were given, each
    /// with its category tags in the order they were attached. Unknown ids
    /// are skipped.
    async fn fetch_products_with_categories(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, StoreError>;

    /// Products tagged with `category_id`, ordered by name.
    async fn fetch_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError>;

    /// A single product with its tags, or `None` when the id is unknown.
    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Products with `term` as a case-insensitive substring of any text
    /// field, ordered by name. A blank term matches nothing.
    async fn search_products(&self, term: &str) -> Result<Vec<Product>, StoreError>;

    /// Up to [`MAX_NAME_SUGGESTIONS`] distinct, non-blank product names in
    /// ascending order, containing `term` case-insensitively. A blank term
    /// applies no filter.
    ///
    /// [`MAX_NAME_SUGGESTIONS`]: crate::utils::constant::MAX_NAME_SUGGESTIONS
    async fn product_name_suggestions(&self, term: &str) -> Result<Vec<String>, StoreError>;
}

/// A store serving both categories and products.
pub trait CatalogStore: CategoryStore + ProductStore {}

impl<T: CategoryStore + ProductStore> CatalogStore for T {}
