//! In-memory post cache
//!
//! Serves every read request; rebuilt wholesale from a backend after each
//! successful mutation. Never consulted for writes.

use std::sync::RwLock;
use tandem_types::PostView;

/// The process-wide post list, lock-protected and owned by `AppState`.
pub struct PostCache {
    posts: RwLock<Vec<PostView>>,
}

impl PostCache {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Replace the entire cached list.
    pub fn replace(&self, posts: Vec<PostView>) {
        *self.posts.write().expect("post cache lock poisoned") = posts;
    }

    /// Clone of the current cached list.
    pub fn snapshot(&self) -> Vec<PostView> {
        self.posts.read().expect("post cache lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.posts.read().expect("post cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PostCache {
    fn default() -> Self {
        Self::new()
    }
}
