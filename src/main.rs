use anyhow::Context;
use informal_prices::api::{self, AppState};
use informal_prices::storage::JsonFileRepository;
use informal_prices::{CityStore, Config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("💱 Informal Prices API");
    info!("======================");

    let config = Config::from_env();

    // Make sure there is a document to read before accepting requests
    let repo = JsonFileRepository::new(&config.data_file);
    repo.ensure_exists()
        .await
        .with_context(|| format!("Failed to prepare {}", config.data_file.display()))?;

    let store = CityStore::new(Arc::new(repo));
    info!(
        "Serving cities from {} ({})",
        config.data_file.display(),
        store.backend_name()
    );

    let server_url = format!("http://localhost:{}", config.port);
    let app = api::router(AppState::new(store, &server_url), &config.public_dir);

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.socket_addr()))?;

    info!("🚀 Listening on {}", server_url);
    info!("📖 API docs at {}/api/docs", server_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
