//! Document store seam: the trait every backend implements, its errors, and the
//! shared handle the HTTP layer reads the connected store from.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{connect_postgres, ensure_database_exists, PgDocumentStore};

use crate::document::{Book, BookId, Document};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Name of the one collection the catalog stores books in.
pub const COLLECTION: &str = "books";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document store is not connected")]
    Unavailable,
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of a merge update. `matched` is zero when no book has the id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
}

/// Operations the catalog needs from a document store. One call per request.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document; the store assigns the id.
    async fn insert_one(&self, doc: Document) -> Result<Book, StoreError>;

    /// All books in the store's natural order.
    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, StoreError>;

    /// Set the top-level fields of `patch` on the book, leaving other fields untouched.
    async fn update_by_id(&self, id: &BookId, patch: Document) -> Result<UpdateOutcome, StoreError>;

    /// Returns the number of books removed (0 or 1).
    async fn delete_by_id(&self, id: &BookId) -> Result<u64, StoreError>;

    /// Round trip used by readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Slot holding the connected store. Empty until bootstrap installs a store;
/// reading an empty slot fails with [`StoreError::Unavailable`].
#[derive(Clone, Default)]
pub struct StoreHandle {
    inner: Arc<RwLock<Option<Arc<dyn DocumentStore>>>>,
}

impl StoreHandle {
    /// Handle with no store installed yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn connected(store: Arc<dyn DocumentStore>) -> Self {
        let handle = Self::empty();
        handle.install(store);
        handle
    }

    /// Install (or replace) the store every subsequent request uses.
    pub fn install(&self, store: Arc<dyn DocumentStore>) {
        let mut slot = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(store);
    }

    pub fn get(&self) -> Result<Arc<dyn DocumentStore>, StoreError> {
        let slot = self.inner.read().map_err(|_| StoreError::Unavailable)?;
        slot.clone().ok_or(StoreError::Unavailable)
    }

    pub fn is_connected(&self) -> bool {
        self.get().is_ok()
    }
}
