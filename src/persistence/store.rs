//! Snapshot blob storage backends.
//!
//! [`SnapshotStore`] is a minimal async key→blob interface. The in-memory
//! backend covers tests and throwaway sessions; the SQLite backend
//! (`sqlite` feature, on by default) covers durable saves.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Backend failure while reading or writing a snapshot blob.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("snapshot store I/O failed: {message}")]
    #[diagnostic(code(storygraph::persistence::store_io))]
    Io { message: String },

    #[cfg(feature = "sqlite")]
    #[error("snapshot database error: {source}")]
    #[diagnostic(
        code(storygraph::persistence::store_db),
        help("Check that the database file is writable and not locked by another process.")
    )]
    Database {
        #[source]
        source: sqlx::Error,
    },
}

/// Async key→blob store. In practice a session addresses one fixed key.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn put(&self, key: &str, blob: &str) -> Result<(), StoreError>;
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Volatile store for tests and sessions that never touch disk.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    blobs: Mutex<FxHashMap<String, String>>,
}

impl InMemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn put(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), blob.to_owned());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use std::path::Path;

    use async_trait::async_trait;
    use chrono::Utc;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

    use super::{SnapshotStore, StoreError};

    /// Durable store backed by a single-table SQLite database.
    ///
    /// Schema: `snapshots(save_key TEXT PRIMARY KEY, blob TEXT, saved_at
    /// TEXT)`; `saved_at` is an RFC3339 stamp refreshed on every save.
    #[derive(Clone, Debug)]
    pub struct SqliteSnapshotStore {
        pool: SqlitePool,
    }

    impl SqliteSnapshotStore {
        /// Opens the database at `path`, creating the file and the
        /// snapshot table if missing.
        pub async fn connect(path: impl AsRef<Path>) -> Result<Self, StoreError> {
            let options = SqliteConnectOptions::new()
                .filename(path.as_ref())
                .create_if_missing(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await
                .map_err(|source| StoreError::Database { source })?;
            sqlx::query(
                "CREATE TABLE IF NOT EXISTS snapshots (
                     save_key TEXT PRIMARY KEY,
                     blob TEXT NOT NULL,
                     saved_at TEXT NOT NULL
                 )",
            )
            .execute(&pool)
            .await
            .map_err(|source| StoreError::Database { source })?;
            tracing::debug!(path = %path.as_ref().display(), "snapshot database ready");
            Ok(Self { pool })
        }
    }

    #[async_trait]
    impl SnapshotStore for SqliteSnapshotStore {
        async fn put(&self, key: &str, blob: &str) -> Result<(), StoreError> {
            sqlx::query(
                "INSERT INTO snapshots (save_key, blob, saved_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(save_key) DO UPDATE
                 SET blob = excluded.blob, saved_at = excluded.saved_at",
            )
            .bind(key)
            .bind(blob)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::Database { source })?;
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let row: Option<(String,)> =
                sqlx::query_as("SELECT blob FROM snapshots WHERE save_key = ?1")
                    .bind(key)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|source| StoreError::Database { source })?;
            Ok(row.map(|(blob,)| blob))
        }
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSnapshotStore;
