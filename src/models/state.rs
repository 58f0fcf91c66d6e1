use std::sync::Arc;

use tracing::info;

use crate::services::store::CatalogStore;

/// Application state shared across requests.
///
/// Holds no per-request data: every resolution builds its own memo.
pub struct AppState {
    /// The catalog backing store.
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        info!("Initializing application state");
        Self { store }
    }
}
