//! # Category Handlers
//!
//! Browsing the tree (roots, children) and resolving ancestor chains for
//! breadcrumbs and filter trees.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{AppState, Category, CategoryId, CategoryView};
use crate::services::hierarchy::HierarchyService;
use crate::utils::constant::MAX_REQUEST_IDS;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ChainsRequest {
    #[validate(length(max = MAX_REQUEST_IDS))]
    pub ids: Vec<CategoryId>,
}

fn views(categories: Vec<Category>) -> Vec<CategoryView> {
    categories.into_iter().map(CategoryView::from).collect()
}

/// Lists the root categories.
///
/// GET /api/categories/roots
///
/// # Returns
///
/// - `200 OK` with `Vec<CategoryView>` ordered by name
/// - `500 Internal Server Error` - Store error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn get_root_categories(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<CategoryView>>> {
    let roots = state.store.fetch_roots().await?;
    debug!(count = roots.len(), "Root categories loaded");
    Ok(Json(views(roots)))
}

/// Lists the direct children of a category.
///
/// GET /api/categories/{id}/children
///
/// An unknown id simply has no children.
#[instrument(skip_all, fields(category_id = id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_child_categories(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> AppResult<Json<Vec<CategoryView>>> {
    let children = state.store.fetch_children(id).await?;
    debug!(count = children.len(), "Child categories loaded");
    Ok(Json(views(children)))
}

/// Looks up a single category.
///
/// GET /api/categories/{id}
///
/// # Returns
///
/// - `200 OK` with `CategoryView`
/// - `404 Not Found` - Unknown category id
/// - `500 Internal Server Error` - Store error
#[instrument(skip_all, fields(category_id = id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> AppResult<Json<CategoryView>> {
    let category = state
        .store
        .fetch_by_id_with_parent(id)
        .await?
        .ok_or(AppError::NotFound("Category not found"))?;

    Ok(Json(category.into()))
}

/// Resolves the ancestor chain of one category, leaf first.
///
/// GET /api/categories/{id}/chain
///
/// # Returns
///
/// - `200 OK` with `Vec<CategoryView>` from the category up to its root
/// - `404 Not Found` - Unknown category id
/// - `500 Internal Server Error` - Store error
#[instrument(skip_all, fields(category_id = id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_category_chain(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> AppResult<Json<Vec<CategoryView>>> {
    let category = state
        .store
        .fetch_by_id_with_parent(id)
        .await?
        .ok_or(AppError::NotFound("Category not found"))?;

    let chain = HierarchyService::new(state.store.as_ref())
        .resolve_for_one_category(&category)
        .await?;

    info!(length = chain.len(), "Category chain resolved");
    Ok(Json(views(chain)))
}

/// Resolves and merges the chains of several categories.
///
/// POST /api/categories/chains ChainsRequest
///
/// The result lists every category once, in first-seen order: the requested
/// ids are taken in order and each chain leaf to root. Unknown ids are skipped.
///
/// # Returns
///
/// - `200 OK` with `Vec<CategoryView>`
/// - `400 Bad Request` - Too many ids
/// - `500 Internal Server Error` - Store error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn resolve_category_chains(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChainsRequest>,
) -> AppResult<Json<Vec<CategoryView>>> {
    payload.validate()?;
    debug!(requested = payload.ids.len(), "Processing chain resolution request");

    let merged = HierarchyService::new(state.store.as_ref())
        .resolve_for_category_ids(&payload.ids)
        .await?;

    info!(merged = merged.len(), "Category chains resolved");
    Ok(Json(views(merged)))
}
