//! Book catalog server.
//!
//! Run from repo root: `cargo run -p catalog-server`
//! Reads DATABASE_URL, DB_NAME, PORT (default 5000) and friends from the environment or `.env`.

use book_catalog::{app, connect_store, AppState, ServerConfig, StoreHandle};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("book_catalog=info,catalog_server=info,tower_http=info")
            }),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };
    let store = StoreHandle::empty();

    // Connect once in the background. Until it succeeds book routes answer with store errors.
    let connect_config = config.clone();
    let connect_handle = store.clone();
    tokio::spawn(async move {
        match connect_store(&connect_config).await {
            Ok(s) => {
                connect_handle.install(s);
                tracing::info!(backend = ?connect_config.backend, "connected to document store");
            }
            Err(e) => tracing::error!(error = %e, "error connecting to document store"),
        }
    });

    let router = app(AppState::new(store), config.max_body_bytes);
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("server is running on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
