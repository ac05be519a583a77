//! Book documents: an open JSON object plus a store-assigned identifier.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Client-supplied fields of a book. Any JSON object is accepted.
pub type Document = Map<String, Value>;

/// Key under which the identifier is exposed. Never taken from a request body.
pub const ID_FIELD: &str = "id";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid book id '{0}'")]
pub struct InvalidBookId(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("update body must contain at least one field")]
    EmptyUpdate,
}

/// Identifier assigned by the document store on insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BookId {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidBookId(s.to_string()))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored book. Serializes flat: `{"id": "...", ...fields}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(flatten)]
    pub fields: Document,
}

impl Book {
    pub fn new(id: BookId, mut fields: Document) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    /// Shallow merge: each top-level key of `patch` overwrites the stored one.
    pub fn merge(&mut self, patch: Document) {
        for (k, v) in patch {
            if k != ID_FIELD {
                self.fields.insert(k, v);
            }
        }
    }
}

/// Turn a request body into a document. Only JSON objects are accepted and
/// a client-supplied `id` is dropped.
pub fn document_from_body(body: Value) -> Result<Document, BodyError> {
    match body {
        Value::Object(mut m) => {
            m.remove(ID_FIELD);
            Ok(m)
        }
        _ => Err(BodyError::NotAnObject),
    }
}

/// Same as [`document_from_body`] but an update must set at least one field.
pub fn patch_from_body(body: Value) -> Result<Document, BodyError> {
    let patch = document_from_body(body)?;
    if patch.is_empty() {
        return Err(BodyError::EmptyUpdate);
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_uuid_ids() {
        let id: BookId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!("not-an-id".parse::<BookId>().is_err());
        assert!("".parse::<BookId>().is_err());
        assert!(" 67e55044-10b1-426f-9247-bb680e5fe0c8".parse::<BookId>().is_err());
        assert!("67e55044-10b1-426f-9247-bb680e5fe0c8\n".parse::<BookId>().is_err());
    }

    #[test]
    fn body_must_be_object_and_drops_id() {
        let doc = document_from_body(json!({"id": "x", "title": "Dune"})).unwrap();
        assert_eq!(Value::Object(doc), json!({"title": "Dune"}));
        assert_eq!(document_from_body(json!([1, 2])), Err(BodyError::NotAnObject));
        assert_eq!(document_from_body(json!("book")), Err(BodyError::NotAnObject));
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert_eq!(patch_from_body(json!({})), Err(BodyError::EmptyUpdate));
        assert_eq!(patch_from_body(json!({"id": "abc"})), Err(BodyError::EmptyUpdate));
        assert!(patch_from_body(json!({"b": 3})).is_ok());
    }

    #[test]
    fn merge_overwrites_only_listed_fields() {
        let fields = document_from_body(json!({"a": 1, "b": 2})).unwrap();
        let mut book = Book::new(BookId::new_v4(), fields);
        book.merge(document_from_body(json!({"b": 3, "c": {"x": 1}})).unwrap());
        assert_eq!(Value::Object(book.fields), json!({"a": 1, "b": 3, "c": {"x": 1}}));
    }

    #[test]
    fn book_serializes_flat() {
        let id = BookId::new_v4();
        let book = Book::new(id, document_from_body(json!({"title": "Emma"})).unwrap());
        let v = serde_json::to_value(&book).unwrap();
        assert_eq!(v, json!({"id": id.to_string(), "title": "Emma"}));
    }
}
