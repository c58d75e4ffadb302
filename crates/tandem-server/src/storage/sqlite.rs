//! SQLite backend (embedded, no server process)

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tandem_types::{NewPost, PostView};

use super::{Backend, PostRow, Result, StorageError};

/// The embedded engine. The database file is created on first connect.
pub struct SqliteBackend {
    options: SqliteConnectOptions,
}

impl SqliteBackend {
    pub fn new(path: &str) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self { options }
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(|e| {
                tracing::warn!("sqlite unavailable: {}", e);
                StorageError::Unavailable(e)
            })
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn ensure_database(&self) -> Result<()> {
        // Embedded engine; nothing to bootstrap server-side.
        Ok(())
    }

    async fn create_schema(&self) -> Result<()> {
        let mut conn = self.connect().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL
            )
            "#,
        )
        .execute(&mut conn)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                content TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
        )
        .execute(&mut conn)
        .await?;

        Ok(())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<()> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;

        sqlx::query("INSERT OR IGNORE INTO users (username) VALUES (?1)")
            .bind(&post.username)
            .execute(&mut *tx)
            .await?;

        let (user_id,): (i64,) = sqlx::query_as("SELECT id FROM users WHERE username = ?1")
            .bind(&post.username)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO posts (user_id, content, created_at) VALUES (?1, ?2, ?3)")
            .bind(user_id)
            .bind(&post.content)
            .bind(post.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_post(&self, id: i64, content: &str) -> Result<()> {
        let mut conn = self.connect().await?;

        sqlx::query("UPDATE posts SET content = ?1 WHERE id = ?2")
            .bind(content)
            .bind(id)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete_post(&self, id: i64) -> Result<()> {
        let mut conn = self.connect().await?;

        sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(id)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<PostView>> {
        let mut conn = self.connect().await?;

        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT p.id, u.username AS author, p.content, p.created_at
            FROM posts p JOIN users u ON p.user_id = u.id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&mut conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn backend(tmp: &TempDir) -> SqliteBackend {
        SqliteBackend::new(tmp.path().join("forum.db").to_str().unwrap())
    }

    #[tokio::test]
    async fn insert_and_list_round_trip() {
        let tmp = TempDir::new().unwrap();
        let db = backend(&tmp);
        db.create_schema().await.unwrap();

        let post = NewPost::new("alice", "hello", Utc::now());
        db.insert_post(&post).await.unwrap();

        let posts = db.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[0].author, "alice");
        assert_eq!(posts[0].content, "hello");
    }

    #[tokio::test]
    async fn repeated_author_reuses_user_row() {
        let tmp = TempDir::new().unwrap();
        let db = backend(&tmp);
        db.create_schema().await.unwrap();

        db.insert_post(&NewPost::new("alice", "first", Utc::now()))
            .await
            .unwrap();
        db.insert_post(&NewPost::new("alice", "second", Utc::now()))
            .await
            .unwrap();

        let posts = db.list_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.author == "alice"));
        // Post ids keep advancing even though the user row is shared
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[1].id, 2);
    }

    #[tokio::test]
    async fn update_replaces_content_in_place() {
        let tmp = TempDir::new().unwrap();
        let db = backend(&tmp);
        db.create_schema().await.unwrap();

        db.insert_post(&NewPost::new("bob", "hello", Utc::now()))
            .await
            .unwrap();
        let before = db.list_posts().await.unwrap();

        db.update_post(1, "bye").await.unwrap();

        let posts = db.list_posts().await.unwrap();
        assert_eq!(posts[0].content, "bye");
        assert_eq!(posts[0].id, 1);
        // Edits never touch the creation stamp
        assert_eq!(posts[0].timestamp, before[0].timestamp);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let db = backend(&tmp);
        db.create_schema().await.unwrap();

        db.update_post(42, "anything").await.unwrap();
        db.delete_post(42).await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let tmp = TempDir::new().unwrap();
        let db = backend(&tmp);
        db.create_schema().await.unwrap();

        db.insert_post(&NewPost::new("carol", "one", Utc::now()))
            .await
            .unwrap();
        db.insert_post(&NewPost::new("carol", "two", Utc::now()))
            .await
            .unwrap();
        db.delete_post(1).await.unwrap();

        let posts = db.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 2);
    }

    #[tokio::test]
    async fn unreachable_file_reports_unavailable() {
        let tmp = TempDir::new().unwrap();
        // Parent directory does not exist, so the connect fails
        let db = SqliteBackend::new(tmp.path().join("missing/forum.db").to_str().unwrap());

        let err = db.list_posts().await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[tokio::test]
    async fn missing_schema_is_a_query_error() {
        let tmp = TempDir::new().unwrap();
        let db = backend(&tmp);
        // No create_schema: the insert must fail loudly, not as Unavailable

        let err = db
            .insert_post(&NewPost::new("dave", "hello", Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Query(_)));
    }
}
