#![allow(dead_code)]

use std::sync::{Arc, Once};

use async_trait::async_trait;
use catalog_hierarchy::models::{Category, CategoryId, CategoryView, Product, ProductId};
use catalog_hierarchy::services::store::{
    CatalogStore, CategoryStore, InMemoryCatalogStore, ProductStore, StoreError,
};
use tokio::net::TcpListener;

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("catalog_hierarchy=debug")
            .with_test_writer()
            .init();
    });
}

/// Loads the shared test catalog from `tests/data/catalog.test.json`.
pub fn test_store() -> InMemoryCatalogStore {
    let seed = std::fs::read_to_string("tests/data/catalog.test.json")
        .expect("Failed to read catalog.test.json");
    InMemoryCatalogStore::from_json(&seed).expect("Failed to load test catalog")
}

/// A store whose backend refuses every request.
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

#[async_trait]
impl ProductStore for UnavailableStore {
    async fn fetch_products_with_categories(
        &self,
        _ids: &[ProductId],
    ) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn fetch_products_by_category(
        &self,
        _category_id: CategoryId,
    ) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn fetch_product(&self, _id: ProductId) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn search_products(&self, _term: &str) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn product_name_suggestions(&self, _term: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Spawns the application on a random port against the test catalog.
///
/// Returned address format: `http://127.0.0.1:8492`
pub async fn spawn_app() -> String {
    spawn_app_with_store(Arc::new(test_store())).await
}

pub async fn spawn_app_with_store(store: Arc<dyn CatalogStore>) -> String {
    init_tracing_once();

    // Randomly choose an available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let app = catalog_hierarchy::app_with_store(store);
        axum::serve(listener, app).await.unwrap();
    });

    let address = format!("http://127.0.0.1:{port}");

    // Wait for server to be ready
    let client = reqwest::Client::new();
    for _ in 0..10 {
        if client
            .get(format!("{address}/health-check"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    address
}

pub fn ids(views: &[CategoryView]) -> Vec<CategoryId> {
    views.iter().map(|v| v.id).collect()
}
