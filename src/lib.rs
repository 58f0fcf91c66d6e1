//! # Catalog Hierarchy - Category Tree Service
//!
//! Resolves the ancestor chains of catalog categories (and of the products
//! tagged with them) from a parent-pointer tree, merging them into stable,
//! duplicate-free lists while keeping store round trips bounded.
//!
//! ## Modules
//!
//! - [`handlers`] - HTTP request handlers for the catalog endpoints
//! - [`models`] - Categories, products and shared application state
//! - [`services`] - Catalog store adapters and the hierarchy engine
//! - [`utils`] - Constants

pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::PgPool;

use crate::handlers::{
    get_category, get_category_chain, get_category_products, get_child_categories, get_product,
    get_root_categories, health_check, resolve_category_chains, resolve_product_categories,
    search_products, suggest_product_names,
};
use crate::models::AppState;
use crate::services::store::{CatalogStore, PgCatalogStore};

/// Creates an Axum router backed by PostgreSQL.
///
/// Convenience wrapper around [`app_with_store`].
#[inline]
pub fn app(db_pool: PgPool) -> Router {
    app_with_store(Arc::new(PgCatalogStore::new(db_pool)))
}

/// Creates an Axum router serving the catalog endpoints from `store`.
pub fn app_with_store(store: Arc<dyn CatalogStore>) -> Router {
    let state = Arc::new(AppState::new(store));

    let category_routes = Router::new()
        .route("/api/categories/roots", get(get_root_categories))
        .route("/api/categories/chains", post(resolve_category_chains))
        .route("/api/categories/{id}", get(get_category))
        .route("/api/categories/{id}/children", get(get_child_categories))
        .route("/api/categories/{id}/chain", get(get_category_chain))
        .route("/api/categories/{id}/products", get(get_category_products));

    let product_routes = Router::new()
        .route("/api/products/categories", post(resolve_product_categories))
        .route("/api/products/search", get(search_products))
        .route("/api/products/suggestions", get(suggest_product_names))
        .route("/api/products/{id}", get(get_product));

    Router::new()
        .route("/health-check", get(health_check))
        .merge(category_routes)
        .merge(product_routes)
        .with_state(state)
}
