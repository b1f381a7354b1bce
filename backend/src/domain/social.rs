//! Social feed: posts, comments and likes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum post or comment length, in characters.
pub const CONTENT_MAX: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentValidationError {
    #[error("content must not be empty")]
    Empty,
    #[error("content must be at most {max} characters")]
    TooLong { max: usize },
}

/// Trimmed user-authored text between 1 and [`CONTENT_MAX`] characters.
///
/// Shared by posts, comments and direct messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content(String);

impl Content {
    pub fn new(raw: &str) -> Result<Self, ContentValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ContentValidationError::Empty);
        }
        if trimmed.chars().count() > CONTENT_MAX {
            return Err(ContentValidationError::TooLong { max: CONTENT_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Keyset position for newest-first timelines: `(created_at, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineKey {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

/// A feed post with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    pub image_url: Option<String>,
    pub like_count: u32,
    pub comment_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn timeline_key(&self) -> TimelineKey {
        TimelineKey {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Result of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: u32,
}
