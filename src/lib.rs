//! Book catalog: CRUD over a collection of schemaless book documents, served over HTTP.

pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{ConfigError, ServerConfig, StoreBackend};
pub use document::{Book, BookId, Document};
pub use error::AppError;
pub use response::MessageBody;
pub use routes::{app, book_routes, probe_routes};
pub use state::AppState;
pub use store::{
    connect_postgres, ensure_database_exists, DocumentStore, MemoryStore, PgDocumentStore, StoreError,
    StoreHandle, UpdateOutcome,
};

use std::sync::Arc;

/// Open the configured backend, ready to be installed into a [`StoreHandle`].
pub async fn connect_store(config: &ServerConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Postgres => Arc::new(connect_postgres(config).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_connects_without_a_database() {
        let config = ServerConfig {
            backend: StoreBackend::Memory,
            ..ServerConfig::default()
        };
        let store = connect_store(&config).await.unwrap();
        assert!(store.ping().await.is_ok());
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
