//! Port for feed posts, likes and comments.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Comment, Content, LikeOutcome, Post, TimelineKey, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by social repository adapters.
    pub enum SocialPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "social repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "social repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialRepository: Send + Sync {
    async fn create_post(
        &self,
        author_id: &UserId,
        content: &Content,
        image_url: Option<String>,
    ) -> Result<Post, SocialPersistenceError>;

    /// Newest first, strictly after `after` in `(created_at, id)` order.
    async fn feed(
        &self,
        after: Option<TimelineKey>,
        limit: usize,
    ) -> Result<Vec<Post>, SocialPersistenceError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, SocialPersistenceError>;

    /// Deletes the post with its likes and comments.
    async fn delete_post(&self, id: Uuid) -> Result<bool, SocialPersistenceError>;

    /// Insert or remove the like and adjust `like_count` in one transaction.
    /// `None` when the post does not exist.
    async fn toggle_like(
        &self,
        user_id: &UserId,
        post_id: Uuid,
    ) -> Result<Option<LikeOutcome>, SocialPersistenceError>;

    /// Insert a comment and bump `comment_count` in one transaction.
    /// `None` when the post does not exist.
    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: &UserId,
        content: &Content,
    ) -> Result<Option<Comment>, SocialPersistenceError>;

    /// Oldest first.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, SocialPersistenceError>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, SocialPersistenceError>;

    /// Remove a comment and decrement `comment_count` in one transaction.
    async fn delete_comment(&self, id: Uuid) -> Result<bool, SocialPersistenceError>;

    async fn delete_posts_before(&self, cutoff: DateTime<Utc>) -> Result<u64, SocialPersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSocialRepository;

#[async_trait]
impl SocialRepository for FixtureSocialRepository {
    async fn create_post(
        &self,
        _author_id: &UserId,
        _content: &Content,
        _image_url: Option<String>,
    ) -> Result<Post, SocialPersistenceError> {
        Err(SocialPersistenceError::connection("no database configured"))
    }

    async fn feed(
        &self,
        _after: Option<TimelineKey>,
        _limit: usize,
    ) -> Result<Vec<Post>, SocialPersistenceError> {
        Ok(Vec::new())
    }

    async fn find_post(&self, _id: Uuid) -> Result<Option<Post>, SocialPersistenceError> {
        Ok(None)
    }

    async fn delete_post(&self, _id: Uuid) -> Result<bool, SocialPersistenceError> {
        Ok(false)
    }

    async fn toggle_like(
        &self,
        _user_id: &UserId,
        _post_id: Uuid,
    ) -> Result<Option<LikeOutcome>, SocialPersistenceError> {
        Ok(None)
    }

    async fn add_comment(
        &self,
        _post_id: Uuid,
        _author_id: &UserId,
        _content: &Content,
    ) -> Result<Option<Comment>, SocialPersistenceError> {
        Ok(None)
    }

    async fn list_comments(&self, _post_id: Uuid) -> Result<Vec<Comment>, SocialPersistenceError> {
        Ok(Vec::new())
    }

    async fn find_comment(&self, _id: Uuid) -> Result<Option<Comment>, SocialPersistenceError> {
        Ok(None)
    }

    async fn delete_comment(&self, _id: Uuid) -> Result<bool, SocialPersistenceError> {
        Ok(false)
    }

    async fn delete_posts_before(&self, _cutoff: DateTime<Utc>) -> Result<u64, SocialPersistenceError> {
        Ok(0)
    }
}
