//! Driving port for the social feed.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{Comment, Content, Error, LikeOutcome, Post, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialFeed: Send + Sync {
    async fn create_post(
        &self,
        caller: &Principal,
        content: Content,
        image_url: Option<String>,
    ) -> Result<Post, Error>;

    /// Newest first, keyset-paginated on `(created_at, id)`.
    async fn feed(&self, page: PageRequest) -> Result<Page<Post>, Error>;

    async fn get_post(&self, id: Uuid) -> Result<Post, Error>;

    async fn delete_post(&self, caller: &Principal, id: Uuid) -> Result<(), Error>;

    async fn toggle_like(&self, caller: &Principal, post_id: Uuid) -> Result<LikeOutcome, Error>;

    async fn add_comment(
        &self,
        caller: &Principal,
        post_id: Uuid,
        content: Content,
    ) -> Result<Comment, Error>;

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, Error>;

    async fn delete_comment(&self, caller: &Principal, id: Uuid) -> Result<(), Error>;
}
