//! Storage layer
//!
//! Two relational engines behind one trait: Postgres (server-style) and
//! SQLite (embedded). Mutations are mirrored into both; reads come from
//! the in-memory cache in [`memory`].

pub mod memory;
pub mod postgres;
pub mod sqlite;

pub use memory::PostCache;
pub use postgres::PostgresBackend;
pub use sqlite::SqliteBackend;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tandem_types::{NewPost, PostView};
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend could not be reached at all. Callers treat this as
    /// "skip the backend", never as a request failure.
    #[error("backend unavailable: {0}")]
    Unavailable(sqlx::Error),

    /// The backend was reachable but the statement failed.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// One of the two relational engines posts are mirrored into.
///
/// Every operation opens a fresh connection and drops it when done; there
/// is no pooling, no retry, and no timeout. A connect failure surfaces as
/// [`StorageError::Unavailable`] after the adapter has logged the reason.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Engine name used in logs.
    fn name(&self) -> &'static str;

    /// Create the target database if the engine hosts databases
    /// server-side. A no-op for embedded engines.
    async fn ensure_database(&self) -> Result<()>;

    /// Create the `users` and `posts` tables if missing.
    async fn create_schema(&self) -> Result<()>;

    /// Insert a post, creating its author row on first use. Runs in a
    /// single transaction.
    async fn insert_post(&self, post: &NewPost) -> Result<()>;

    /// Replace a post's body. Succeeds even when no row matches the id.
    async fn update_post(&self, id: i64, content: &str) -> Result<()>;

    /// Delete a post. Succeeds even when no row matches the id.
    async fn delete_post(&self, id: i64) -> Result<()>;

    /// All posts joined with their authors, oldest first.
    async fn list_posts(&self) -> Result<Vec<PostView>>;
}

/// Row shape of the posts/users join, shared by both engines.
#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    id: i64,
    author: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for PostView {
    fn from(r: PostRow) -> Self {
        PostView {
            id: r.id,
            author: r.author,
            content: r.content,
            timestamp: r.created_at,
        }
    }
}
