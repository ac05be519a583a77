//! In-process document store. Insertion order is the natural order.

use super::{DocumentStore, StoreError, UpdateOutcome};
use crate::document::{Book, BookId, Document};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, doc: Document) -> Result<Book, StoreError> {
        let book = Book::new(BookId::new_v4(), doc);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().await.clone())
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.iter().find(|b| &b.id == id).cloned())
    }

    async fn update_by_id(&self, id: &BookId, patch: Document) -> Result<UpdateOutcome, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::InvalidDocument("update must set at least one field".into()));
        }
        let mut books = self.books.write().await;
        match books.iter_mut().find(|b| &b.id == id) {
            Some(book) => {
                book.merge(patch);
                Ok(UpdateOutcome { matched: 1 })
            }
            None => Ok(UpdateOutcome { matched: 0 }),
        }
    }

    async fn delete_by_id(&self, id: &BookId) -> Result<u64, StoreError> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| &b.id != id);
        Ok((before - books.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document_from_body;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        document_from_body(v).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.insert_one(doc(json!({"title": "A"}))).await.unwrap();
        let b = store.insert_one(doc(json!({"title": "A"}))).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = MemoryStore::new();
        let a = store.insert_one(doc(json!({"n": 1}))).await.unwrap();
        let b = store.insert_one(doc(json!({"n": 2}))).await.unwrap();
        let ids: Vec<_> = store.find_all().await.unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn update_reports_match_count() {
        let store = MemoryStore::new();
        let a = store.insert_one(doc(json!({"a": 1, "b": 2}))).await.unwrap();
        let hit = store.update_by_id(&a.id, doc(json!({"b": 3}))).await.unwrap();
        assert_eq!(hit.matched, 1);
        let miss = store.update_by_id(&BookId::new_v4(), doc(json!({"b": 3}))).await.unwrap();
        assert_eq!(miss.matched, 0);
        let stored = store.find_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(serde_json::Value::Object(stored.fields), json!({"a": 1, "b": 3}));
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let store = MemoryStore::new();
        let a = store.insert_one(doc(json!({"a": 1}))).await.unwrap();
        let err = store.update_by_id(&a.id, Document::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn delete_is_not_repeatable() {
        let store = MemoryStore::new();
        let a = store.insert_one(doc(json!({"a": 1}))).await.unwrap();
        assert_eq!(store.delete_by_id(&a.id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(&a.id).await.unwrap(), 0);
        assert!(store.is_empty().await);
    }
}
