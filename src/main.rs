//! Book Loans Server
//!
//! HTTP front for the book loan request dispatcher.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookloans_server::{
    api,
    config::{AppConfig, StorageBackend, StorageConfig},
    repository::{memory::MemoryBookStore, redis::RedisBookStore, BookStore, Repository},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config);

    tracing::info!("Starting Book Loans Server v{}", env!("CARGO_PKG_VERSION"));

    // One store handle for the lifetime of the process
    let store = connect_store(&config.storage).await?;
    let services = Services::new(Repository::new(store));

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookloans_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_store(storage: &StorageConfig) -> anyhow::Result<Arc<dyn BookStore>> {
    match storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, records are lost on restart");
            Ok(Arc::new(MemoryBookStore::new()))
        }
        StorageBackend::Redis => {
            let store = RedisBookStore::connect(&storage.redis_url, &storage.table)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!(table = %storage.table, "Connected to Redis");
            Ok(Arc::new(store))
        }
    }
}
