//! Dual-store post coordination
//!
//! Every mutation is applied to both backends in a fixed order: the
//! server-style store first, the embedded store last. The pairing is a
//! best-effort mirror, not a consistency mechanism: the stores are not
//! transactionally linked, and a divergence (one write landing while the
//! other fails) is neither detected nor repaired.

use std::sync::Arc;

use chrono::Utc;
use tandem_types::{clip_content, NewPost};
use tracing::{debug, info, warn};

use crate::storage::{Backend, PostCache, Result, StorageError};

pub struct PostService {
    backends: Vec<Arc<dyn Backend>>,
    cache: Arc<PostCache>,
}

impl PostService {
    pub fn new(backends: Vec<Arc<dyn Backend>>, cache: Arc<PostCache>) -> Self {
        Self { backends, cache }
    }

    /// Store a new post in every reachable backend.
    ///
    /// Unreachable backends are skipped; any other failure aborts the
    /// request immediately, without attempting the remaining backends and
    /// without undoing writes that already landed. Update and delete are
    /// deliberately more tolerant — this asymmetry is part of the
    /// documented behavior.
    pub async fn create_post(&self, username: &str, content: &str) -> Result<()> {
        info!("Creating post: user={}", username);
        let post = NewPost::new(username, content, Utc::now());

        for backend in &self.backends {
            match backend.insert_post(&post).await {
                Ok(()) => debug!("{}: post stored", backend.name()),
                Err(StorageError::Unavailable(_)) => continue,
                Err(e) => {
                    tracing::error!("{}: insert failed: {}", backend.name(), e);
                    return Err(e);
                }
            }
        }

        self.rebuild_cache().await;
        Ok(())
    }

    /// Replace a post's body in every backend, best-effort.
    ///
    /// Returns true if at least one backend took the update.
    pub async fn update_post(&self, id: i64, content: &str) -> bool {
        debug!("Updating post {}", id);
        let content = clip_content(content);

        let mut updated = false;
        for backend in &self.backends {
            match backend.update_post(id, content).await {
                Ok(()) => updated = true,
                Err(e) => warn!("{}: update skipped: {}", backend.name(), e),
            }
        }

        if updated {
            self.rebuild_cache().await;
        }
        updated
    }

    /// Delete a post from every backend, best-effort, same policy as
    /// [`update_post`](Self::update_post).
    pub async fn delete_post(&self, id: i64) -> bool {
        info!("Deleting post {}", id);

        let mut deleted = false;
        for backend in &self.backends {
            match backend.delete_post(id).await {
                Ok(()) => deleted = true,
                Err(e) => warn!("{}: delete skipped: {}", backend.name(), e),
            }
        }

        if deleted {
            self.rebuild_cache().await;
        }
        deleted
    }

    /// Re-read every backend in order, each successful read replacing the
    /// whole cache, so the last reachable backend determines what readers
    /// see.
    pub async fn rebuild_cache(&self) {
        for backend in &self.backends {
            match backend.list_posts().await {
                Ok(posts) => {
                    debug!("{}: cache rebuilt, {} posts", backend.name(), posts.len());
                    self.cache.replace(posts);
                }
                Err(e) => warn!("{}: cache rebuild skipped: {}", backend.name(), e),
            }
        }
    }
}
