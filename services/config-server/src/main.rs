use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config_server::{app, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting config server v{}...", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(AppState::from_settings(&settings).await?);
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr()).await?;
    info!("🚀 Config server listening on {}", settings.bind_addr());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Config server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
