//! Book handlers: one store call per request, result mapped to a status and JSON body.
//!
//! Failure status per route when the store errors: create and update answer 400,
//! list, read and delete answer 500. A malformed id is 400 everywhere.

use crate::document::{document_from_body, patch_from_body, Book, BookId};
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response::{message, MessageBody};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub const WELCOME: &str = "Welcome to the Book Catalog API";

pub async fn welcome() -> &'static str {
    WELCOME
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Book>, AppError> {
    let doc = document_from_body(body)?;
    let store = state.store.get().map_err(AppError::bad_request)?;
    let book = store.insert_one(doc).await.map_err(AppError::bad_request)?;
    tracing::debug!(id = %book.id, "book created");
    Ok(Json(book))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    let store = state.store.get().map_err(AppError::internal)?;
    let books = store.find_all().await.map_err(AppError::internal)?;
    Ok(Json(books))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Book>, AppError> {
    let id: BookId = id_str.parse()?;
    let store = state.store.get().map_err(AppError::internal)?;
    let book = store
        .find_by_id(&id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(AppError::book_not_found)?;
    Ok(Json(book))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<MessageBody>, AppError> {
    let id: BookId = id_str.parse()?;
    let patch = patch_from_body(body)?;
    let store = state.store.get().map_err(AppError::bad_request)?;
    let outcome = store.update_by_id(&id, patch).await.map_err(AppError::bad_request)?;
    if outcome.matched == 0 {
        return Err(AppError::book_not_found());
    }
    tracing::debug!(%id, "book updated");
    Ok(message("Book updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id: BookId = id_str.parse()?;
    let store = state.store.get().map_err(AppError::internal)?;
    let deleted = store.delete_by_id(&id).await.map_err(AppError::internal)?;
    if deleted == 0 {
        return Err(AppError::book_not_found());
    }
    tracing::debug!(%id, "book deleted");
    Ok(message("Book deleted successfully"))
}

/// JSON 404 for paths no route matches.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".into())
}
