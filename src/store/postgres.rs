//! PostgreSQL-backed document store: one JSONB document per row in a `books` table.

use super::{DocumentStore, StoreError, UpdateOutcome, COLLECTION};
use crate::config::ServerConfig;
use crate::document::{Book, BookId, Document};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use uuid::Uuid;

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
    /// Schema-qualified, quoted table name (e.g. `"public"."books"`).
    table: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        Self {
            pool,
            schema: schema.to_string(),
            table: format!("{}.{}", quote_ident(schema), quote_ident(COLLECTION)),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the schema and the books table if they do not exist.
    pub async fn ensure_books_table(&self) -> Result<(), StoreError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&self.schema)))
            .execute(&self.pool)
            .await?;
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }
}

fn to_book((id, Json(fields)): (Uuid, Json<Document>)) -> Book {
    Book::new(BookId::from(id), fields)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(&self, doc: Document) -> Result<Book, StoreError> {
        let id = BookId::new_v4();
        sqlx::query(&format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", self.table))
            .bind(id.as_uuid())
            .bind(Json(&doc))
            .execute(&self.pool)
            .await?;
        Ok(Book::new(id, doc))
    }

    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let rows: Vec<(Uuid, Json<Document>)> =
            sqlx::query_as(&format!("SELECT id, doc FROM {}", self.table))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(to_book).collect())
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, StoreError> {
        let row: Option<(Uuid, Json<Document>)> =
            sqlx::query_as(&format!("SELECT id, doc FROM {} WHERE id = $1", self.table))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(to_book))
    }

    async fn update_by_id(&self, id: &BookId, patch: Document) -> Result<UpdateOutcome, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::InvalidDocument("update must set at least one field".into()));
        }
        // jsonb `||` replaces top-level keys present on the right and keeps the rest.
        let result = sqlx::query(&format!("UPDATE {} SET doc = doc || $2 WHERE id = $1", self.table))
            .bind(id.as_uuid())
            .bind(Json(&patch))
            .execute(&self.pool)
            .await?;
        Ok(UpdateOutcome {
            matched: result.rows_affected(),
        })
    }

    async fn delete_by_id(&self, id: &BookId) -> Result<u64, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", self.table))
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Connection options from the configured URL, with `db_name` overriding the URL's database.
pub fn connect_options(database_url: &str, db_name: Option<&str>) -> Result<PgConnectOptions, StoreError> {
    let opts = PgConnectOptions::from_str(database_url)?;
    Ok(match db_name {
        Some(name) => opts.database(name),
        None => opts,
    })
}

/// Create the target database through the `postgres` maintenance database when it is missing.
pub async fn ensure_database_exists(opts: &PgConnectOptions) -> Result<(), StoreError> {
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(()),
    };
    let mut conn = opts.clone().database("postgres").connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// Ensure database and table exist, then open the shared pool.
pub async fn connect_postgres(config: &ServerConfig) -> Result<PgDocumentStore, StoreError> {
    let opts = connect_options(&config.database_url, config.db_name.as_deref())?;
    ensure_database_exists(&opts).await?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(opts)
        .await?;
    let store = PgDocumentStore::new(pool, &config.schema);
    store.ensure_books_table().await?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("books"), "\"books\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn db_name_overrides_url_database() {
        let opts = connect_options("postgres://user@localhost:5432/from_url", Some("catalog")).unwrap();
        assert_eq!(opts.get_database(), Some("catalog"));
        let opts = connect_options("postgres://user@localhost:5432/from_url", None).unwrap();
        assert_eq!(opts.get_database(), Some("from_url"));
    }

    #[test]
    fn rejects_malformed_url() {
        assert!(connect_options("not a url", None).is_err());
    }

    #[tokio::test]
    async fn table_name_is_schema_qualified() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/book_catalog")
            .unwrap();
        let store = PgDocumentStore::new(pool, "catalog");
        assert_eq!(store.table, "\"catalog\".\"books\"");
    }

    /// Runs against a live server: `DATABASE_URL=postgres://... cargo test -- --ignored`.
    #[tokio::test]
    #[ignore = "needs a PostgreSQL server at DATABASE_URL"]
    async fn jsonb_merge_and_counts_against_live_database() {
        use crate::document::document_from_body;
        use serde_json::{json, Value};

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
        let schema = format!("catalog_test_{}", Uuid::new_v4().simple());
        let config = ServerConfig {
            database_url: url,
            schema: schema.clone(),
            ..ServerConfig::default()
        };
        let store = connect_postgres(&config).await.unwrap();

        let created = store
            .insert_one(document_from_body(json!({"a": 1, "b": 2, "nested": {"x": [1, 2]}})).unwrap())
            .await
            .unwrap();
        let fetched = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let outcome = store
            .update_by_id(&created.id, document_from_body(json!({"b": 3, "nested": "flat"})).unwrap())
            .await
            .unwrap();
        assert_eq!(outcome.matched, 1);
        let merged = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(Value::Object(merged.fields), json!({"a": 1, "b": 3, "nested": "flat"}));

        let missing = BookId::new_v4();
        let outcome = store
            .update_by_id(&missing, document_from_body(json!({"b": 4})).unwrap())
            .await
            .unwrap();
        assert_eq!(outcome.matched, 0);

        assert_eq!(store.find_all().await.unwrap().len(), 1);
        assert_eq!(store.delete_by_id(&created.id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(&created.id).await.unwrap(), 0);
        assert!(store.find_by_id(&created.id).await.unwrap().is_none());

        sqlx::query(&format!("DROP SCHEMA {} CASCADE", quote_ident(&schema)))
            .execute(store.pool())
            .await
            .unwrap();
    }
}
