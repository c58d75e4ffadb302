//! Post types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum stored length of a post body, in characters.
pub const MAX_CONTENT_CHARS: usize = 500;

/// A post accepted for writing: validated, clipped, and stamped.
///
/// The author is referenced by username; backends create the user row
/// implicitly on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Build a write-ready post, clipping the body to [`MAX_CONTENT_CHARS`].
    pub fn new(username: &str, content: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            username: username.to_string(),
            content: clip_content(content).to_string(),
            created_at,
        }
    }
}

/// Denormalized post projection served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Clip a post body to [`MAX_CONTENT_CHARS`] characters.
///
/// Counts characters, not bytes, so multi-byte content is never split
/// mid code point.
pub fn clip_content(content: &str) -> &str {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
