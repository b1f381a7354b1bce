//! Feed posts, likes and comments.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{CursorError, Page, PageRequest};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::formatting::normalize_optional_url;
use crate::domain::ports::{SocialFeed, SocialRepository};
use crate::domain::repository_errors::map_social_error;
use crate::domain::{Comment, Content, Error, LikeOutcome, Post, Principal, TimelineKey};

/// Social service implementing the [`SocialFeed`] driving port.
#[derive(Clone)]
pub struct SocialService<R> {
    social: Arc<R>,
}

impl<R> SocialService<R> {
    pub fn new(social: Arc<R>) -> Self {
        Self { social }
    }
}

pub(crate) fn invalid_cursor(error: CursorError) -> Error {
    Error::invalid_request(format!("invalid cursor: {error}"))
}

pub(crate) fn cursor_encoding(error: CursorError) -> Error {
    Error::internal(format!("failed to encode cursor: {error}"))
}

fn post_not_found(id: Uuid) -> Error {
    Error::not_found(format!("post {id} not found"))
}

impl<R: SocialRepository> SocialService<R> {
    async fn load_post(&self, id: Uuid) -> Result<Post, Error> {
        self.social
            .find_post(id)
            .await
            .map_err(map_social_error)?
            .ok_or_else(|| post_not_found(id))
    }
}

#[async_trait]
impl<R> SocialFeed for SocialService<R>
where
    R: SocialRepository,
{
    async fn create_post(
        &self,
        caller: &Principal,
        content: Content,
        image_url: Option<String>,
    ) -> Result<Post, Error> {
        let image_url = normalize_optional_url(image_url.as_deref())
            .map_err(|err| Error::invalid_request(format!("imageUrl: {err}")))?;
        let post = self
            .social
            .create_post(&caller.user_id, &content, image_url)
            .await
            .map_err(map_social_error)?;
        info!(post_id = %post.id, author_id = %caller.user_id, "post created");
        Ok(post)
    }

    async fn feed(&self, page: PageRequest) -> Result<Page<Post>, Error> {
        let after = page
            .decode_cursor::<TimelineKey>()
            .map_err(invalid_cursor)?;
        let rows = self
            .social
            .feed(after, page.fetch_limit())
            .await
            .map_err(map_social_error)?;
        Page::from_overfetched(rows, &page, Post::timeline_key).map_err(cursor_encoding)
    }

    async fn get_post(&self, id: Uuid) -> Result<Post, Error> {
        self.load_post(id).await
    }

    async fn delete_post(&self, caller: &Principal, id: Uuid) -> Result<(), Error> {
        let post = self.load_post(id).await?;
        caller.require_owner_or_admin(&post.author_id)?;
        if !self.social.delete_post(id).await.map_err(map_social_error)? {
            return Err(post_not_found(id));
        }
        info!(post_id = %id, deleted_by = %caller.user_id, "post deleted");
        Ok(())
    }

    async fn toggle_like(&self, caller: &Principal, post_id: Uuid) -> Result<LikeOutcome, Error> {
        let outcome = self
            .social
            .toggle_like(&caller.user_id, post_id)
            .await
            .map_err(map_social_error)?
            .ok_or_else(|| post_not_found(post_id))?;
        debug!(%post_id, liked = outcome.liked, "like toggled");
        Ok(outcome)
    }

    async fn add_comment(
        &self,
        caller: &Principal,
        post_id: Uuid,
        content: Content,
    ) -> Result<Comment, Error> {
        self.social
            .add_comment(post_id, &caller.user_id, &content)
            .await
            .map_err(map_social_error)?
            .ok_or_else(|| post_not_found(post_id))
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, Error> {
        self.load_post(post_id).await?;
        self.social
            .list_comments(post_id)
            .await
            .map_err(map_social_error)
    }

    async fn delete_comment(&self, caller: &Principal, id: Uuid) -> Result<(), Error> {
        let missing = || Error::not_found(format!("comment {id} not found"));
        let comment = self
            .social
            .find_comment(id)
            .await
            .map_err(map_social_error)?
            .ok_or_else(missing)?;
        caller.require_owner_or_admin(&comment.author_id)?;
        if self
            .social
            .delete_comment(id)
            .await
            .map_err(map_social_error)?
        {
            Ok(())
        } else {
            Err(missing())
        }
    }
}

#[cfg(test)]
#[path = "social_service_tests.rs"]
mod tests;
