//! Carpool Ledger Server
//!
//! Main entry point for the carpool ledger service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carpool_api::{AppState, create_router, create_router_with_static};
use carpool_core::storage::{StateStore, StorageConfig};
use carpool_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carpool=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Open the state document
    let storage = StorageConfig::from_settings(&config.storage)?;
    let store = StateStore::from_config(storage)?;
    info!(
        provider = store.provider_name(),
        key = %store.config().document_key,
        "Storage configured"
    );
    let state = AppState::load(store).await;

    // Create router
    let app = match &config.server.static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Serving static files");
            create_router_with_static(state, dir)
        }
        None => create_router(state),
    };

    // Start server
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
