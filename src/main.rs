// This is the entry point of the safety alert service.
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the HTTP router
// 4. Serve until shutdown

use anyhow::Result;
use bewust_safety::config::{AppConfig, StoreBackend};
use bewust_safety::core::safety::KeywordScanner;
use bewust_safety::infra::safety::{InMemoryAlertStore, SqliteAlertStore};
use bewust_safety::web::{build_router, AppState, SharedAlertStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let scanner = Arc::new(KeywordScanner::new(config.load_vocabulary()?));

    let store: SharedAlertStore = match config.store {
        StoreBackend::Sqlite => {
            let store = SqliteAlertStore::connect(&config.database_url).await?;
            tracing::info!(database = %config.database_url, "Using SQLite alert store");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory alert store, alerts are lost on restart");
            Arc::new(InMemoryAlertStore::new())
        }
    };

    let state = AppState::new(store, scanner, config.page_size);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Safety alert service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
