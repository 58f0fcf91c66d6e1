//! # Product Handlers
//!
//! Product lookup and free-text search, products listed per category, and
//! the merged category hierarchy of a set of products (used to build the
//! filter tree of a result page).

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{AppState, CategoryId, CategoryView, Product, ProductId};
use crate::services::hierarchy::HierarchyService;
use crate::utils::constant::{MAX_REQUEST_IDS, MAX_SEARCH_TERM_LENGTH};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProductCategoriesRequest {
    #[validate(length(max = MAX_REQUEST_IDS))]
    pub product_ids: Vec<ProductId>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(length(max = MAX_SEARCH_TERM_LENGTH))]
    pub q: String,
}

/// Looks up a single product with its category tags.
///
/// GET /api/products/{id}
///
/// # Returns
///
/// - `200 OK` with `Product`
/// - `404 Not Found` - Unknown product id
/// - `500 Internal Server Error` - Store error
#[instrument(skip_all, fields(product_id = id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProductId>,
) -> AppResult<Json<Product>> {
    let product = state
        .store
        .fetch_product(id)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    Ok(Json(product))
}

/// Free-text product search.
///
/// GET /api/products/search?q=term
///
/// Matches `q` case-insensitively against the name, brand, type and the
/// descriptive text fields. A missing or blank term returns an empty list.
///
/// # Returns
///
/// - `200 OK` with `Vec<Product>` ordered by name
/// - `400 Bad Request` - Term too long
/// - `500 Internal Server Error` - Store error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    query.validate()?;

    let products = state.store.search_products(&query.q).await?;
    info!(found = products.len(), "Product search completed");
    Ok(Json(products))
}

/// Product name suggestions for search-as-you-type.
///
/// GET /api/products/suggestions?q=term
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn suggest_product_names(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<String>>> {
    query.validate()?;

    let names = state.store.product_name_suggestions(&query.q).await?;
    debug!(count = names.len(), "Name suggestions loaded");
    Ok(Json(names))
}

/// Lists the products tagged with a category.
///
/// GET /api/categories/{id}/products
///
/// # Returns
///
/// - `200 OK` with `Vec<Product>` ordered by name
/// - `500 Internal Server Error` - Store error
#[instrument(skip_all, fields(category_id = id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_category_products(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.store.fetch_products_by_category(id).await?;
    debug!(count = products.len(), "Products loaded for category");
    Ok(Json(products))
}

/// Resolves the merged category hierarchy of a set of products.
///
/// POST /api/products/categories ProductCategoriesRequest
///
/// Tags are taken product by product in request order; every category and
/// ancestor appears once. Unknown products and products without tags
/// contribute nothing.
///
/// # Returns
///
/// - `200 OK` with `Vec<CategoryView>`
/// - `400 Bad Request` - Too many ids
/// - `500 Internal Server Error` - Store error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn resolve_product_categories(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProductCategoriesRequest>,
) -> AppResult<Json<Vec<CategoryView>>> {
    payload.validate()?;

    let products = state
        .store
        .fetch_products_with_categories(&payload.product_ids)
        .await?;
    debug!(
        requested = payload.product_ids.len(),
        found = products.len(),
        untagged = products.iter().filter(|p| !p.has_categories()).count(),
        "Products loaded"
    );

    let merged = HierarchyService::new(state.store.as_ref())
        .resolve_for_entities(&products)
        .await?;

    info!(merged = merged.len(), "Product categories resolved");
    Ok(Json(merged.into_iter().map(CategoryView::from).collect()))
}
