//! Shared application state for all routes.

use crate::store::StoreHandle;

#[derive(Clone)]
pub struct AppState {
    /// Filled once the store connects; requests before that fail with a store error.
    pub store: StoreHandle,
}

impl AppState {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }
}
