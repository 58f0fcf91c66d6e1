use std::env;
use std::sync::Arc;

use catalog_hierarchy::app_with_store;
use catalog_hierarchy::services::store::{CatalogStore, InMemoryCatalogStore, PgCatalogStore};
use catalog_hierarchy::utils::constant::DEFAULT_BIND_ADDR;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_hierarchy=info"));

    let production = env::var("APP_ENV")
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false);

    if production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                "catalog-hierarchy".into(),
                std::io::stdout,
            ))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_store() -> Arc<dyn CatalogStore> {
    if let Ok(database_url) = env::var("DATABASE_URL") {
        info!("Using PostgreSQL catalog store");
        let db_pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to database");
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .expect("Failed to run database migrations");
        return Arc::new(PgCatalogStore::new(db_pool));
    }

    let seed_file = env::var("CATALOG_SEED_FILE")
        .expect("Either `DATABASE_URL` or `CATALOG_SEED_FILE` should be set");
    info!(seed_file = %seed_file, "Using in-memory catalog store");
    let content = std::fs::read_to_string(&seed_file).expect("Failed to read catalog seed file");
    Arc::new(InMemoryCatalogStore::from_json(&content).expect("Failed to parse catalog seed file"))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let store = build_store().await;
    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    info!("Server starting at http://{}", addr);

    axum::serve(listener, app_with_store(store).into_make_service())
        .await
        .expect("Server error");
}
