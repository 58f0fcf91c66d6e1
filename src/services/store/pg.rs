//! PostgreSQL implementation of the catalog store.
//!
//! Legacy rows use `parent_id = 0` as well as `NULL` for roots; both are
//! normalized to `None` here so nothing above this layer sees the sentinel.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::{CategoryStore, ProductStore, StoreError};
use crate::models::{Category, CategoryId, Product, ProductId};
use crate::utils::constant::MAX_NAME_SUGGESTIONS;

const CATEGORY_COLUMNS: &str = r#"
    id,
    COALESCE(name, '') AS name,
    sap_name,
    image,
    COALESCE(published, TRUE) AS published,
    NULLIF(parent_id, 0) AS parent_id
"#;

const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id,
        COALESCE(p.name, '') AS name,
        p.brand,
        p.type AS type_name,
        p.description,
        p.protects_against,
        p.does_not_protect_against,
        p.notes,
        p.usage_instructions,
        p.distribution,
        p.standards,
        p.image,
        COALESCE(
            ARRAY_AGG(pc.category_id ORDER BY pc.id) FILTER (WHERE pc.category_id IS NOT NULL),
            '{}'
        ) AS category_ids
    FROM product p
    LEFT JOIN product_category pc ON pc.product_id = p.id
"#;

const SEARCH_PREDICATE: &str = r#"
    p.name ILIKE $1
    OR p.brand ILIKE $1
    OR p.type ILIKE $1
    OR p.description ILIKE $1
    OR p.protects_against ILIKE $1
    OR p.does_not_protect_against ILIKE $1
    OR p.notes ILIKE $1
    OR p.usage_instructions ILIKE $1
    OR p.distribution ILIKE $1
    OR p.standards ILIKE $1
"#;

/// Wraps `term` in `%` wildcards, escaping the characters `ILIKE` treats
/// specially so the term is matched literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct PgCatalogStore {
    db_pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CategoryStore for PgCatalogStore {
    #[instrument(skip_all)]
    async fn fetch_roots(&self) -> Result<Vec<Category>, StoreError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM category \
             WHERE parent_id IS NULL OR parent_id = 0 ORDER BY name, id"
        );
        let roots = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.db_pool)
            .await?;

        debug!(count = roots.len(), "Fetched root categories");
        Ok(roots)
    }

    #[instrument(skip(self))]
    async fn fetch_children(&self, parent_id: CategoryId) -> Result<Vec<Category>, StoreError> {
        // `parent_id = 0` rows are roots, not children of a category `0`
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM category \
             WHERE parent_id = $1 AND parent_id <> 0 ORDER BY name, id"
        );
        let children = sqlx::query_as::<_, Category>(&sql)
            .bind(parent_id)
            .fetch_all(&self.db_pool)
            .await?;

        debug!(count = children.len(), "Fetched child categories");
        Ok(children)
    }

    #[instrument(skip_all, fields(requested = ids.len()))]
    async fn fetch_by_ids_with_parent(
        &self,
        ids: &[CategoryId],
    ) -> Result<Vec<Category>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE id = ANY($1)");
        let categories = sqlx::query_as::<_, Category>(&sql)
            .bind(ids)
            .fetch_all(&self.db_pool)
            .await?;

        debug!(found = categories.len(), "Bulk fetched categories");
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn fetch_by_id_with_parent(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, StoreError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE id = $1");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(category)
    }
}

#[async_trait]
impl ProductStore for PgCatalogStore {
    #[instrument(skip_all, fields(requested = ids.len()))]
    async fn fetch_products_with_categories(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{PRODUCT_SELECT} WHERE p.id = ANY($1) GROUP BY p.id \
             ORDER BY array_position($1::int4[], p.id)"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(ids)
            .fetch_all(&self.db_pool)
            .await?;

        debug!(found = products.len(), "Fetched products with categories");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn fetch_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "{PRODUCT_SELECT} \
             WHERE p.id IN (SELECT product_id FROM product_category WHERE category_id = $1) \
             GROUP BY p.id ORDER BY p.name, p.id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .fetch_all(&self.db_pool)
            .await?;

        debug!(found = products.len(), "Fetched products by category");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1 GROUP BY p.id");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn search_products(&self, term: &str) -> Result<Vec<Product>, StoreError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{PRODUCT_SELECT} WHERE {SEARCH_PREDICATE} GROUP BY p.id ORDER BY p.name, p.id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(contains_pattern(term))
            .fetch_all(&self.db_pool)
            .await?;

        debug!(found = products.len(), "Searched products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn product_name_suggestions(&self, term: &str) -> Result<Vec<String>, StoreError> {
        let term = term.trim();
        let pattern = (!term.is_empty()).then(|| contains_pattern(term));

        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT name
            FROM product
            WHERE name IS NOT NULL
              AND btrim(name) <> ''
              AND ($1::text IS NULL OR name ILIKE $1)
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(MAX_NAME_SUGGESTIONS as i64)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(names)
    }
}
