//! Process configuration read from the environment (a `.env` file is honoured by the binary).

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/book_catalog";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown store backend '{0}' (expected 'postgres' or 'memory')")]
    UnknownBackend(String),
}

/// Which document store the server connects to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `DATABASE_URL`
    pub database_url: String,
    /// `DB_NAME`; overrides the database named in the URL.
    pub db_name: Option<String>,
    /// `BOOK_CATALOG_SCHEMA`, default `public`.
    pub schema: String,
    /// `PORT`, default 5000.
    pub port: u16,
    /// `BOOK_STORE`, default postgres.
    pub backend: StoreBackend,
    /// `DB_MAX_CONNECTIONS`, default 5.
    pub max_connections: u32,
    /// `DB_ACQUIRE_TIMEOUT_SECS`, default 5. Bounds how long a request waits on an unreachable store.
    pub acquire_timeout: Duration,
    /// `MAX_BODY_BYTES`, default 1 MiB.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.into(),
            db_name: None,
            schema: "public".into(),
            port: DEFAULT_PORT,
            backend: StoreBackend::Postgres,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            max_body_bytes: 1024 * 1024,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue { key, value: v }),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let backend = match get("BOOK_STORE") {
            Some(v) => v.parse()?,
            None => defaults.backend,
        };
        let timeout_secs = parse_var("DB_ACQUIRE_TIMEOUT_SECS", get("DB_ACQUIRE_TIMEOUT_SECS"), 5u64)?;

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            db_name: get("DB_NAME"),
            schema: get("BOOK_CATALOG_SCHEMA").unwrap_or(defaults.schema),
            port: parse_var("PORT", get("PORT"), defaults.port)?,
            backend,
            max_connections: parse_var("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), defaults.max_connections)?,
            acquire_timeout: Duration::from_secs(timeout_secs),
            max_body_bytes: parse_var("MAX_BODY_BYTES", get("MAX_BODY_BYTES"), defaults.max_body_bytes)?,
        })
    }
}
