//! Ecclesia website backend binary.

use ecclesia_backend::config::{Config, LogFormat, StoreBackend};
use ecclesia_backend::{create_router, db, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Ecclesia backend");
    tracing::info!("Store backend: {:?}", config.store);
    if config.store == StoreBackend::Sqlite {
        tracing::info!("Database path: {:?}", config.db_path);
    } else {
        tracing::warn!("Using in-memory store; submissions are lost on restart");
    }
    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving website from {:?}", dir);
    }
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize store
    let store = db::open_store(&config).await?;

    // Build router
    let bind_addr = config.bind_addr;
    let app = create_router(AppState::new(store, config));

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
