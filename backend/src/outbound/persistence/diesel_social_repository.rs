//! PostgreSQL-backed `SocialRepository`: posts, likes and comments.
//!
//! Like and comment counters live on the post row and are adjusted in the
//! same transaction as the row they count.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{SocialPersistenceError, SocialRepository};
use crate::domain::{Comment, Content, LikeOutcome, Post, TimelineKey, UserId};

use super::error_mapping::{count_u32, impl_persistence_error_from, rows_u64};
use super::models::{CommentRow, PostRow};
use super::pool::DbPool;
use super::schema::{comments, post_likes, posts, users};

impl_persistence_error_from!(SocialPersistenceError);

/// Diesel implementation of [`SocialRepository`].
#[derive(Clone)]
pub struct DieselSocialRepository {
    pool: DbPool,
}

impl DieselSocialRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_post(row: PostRow, author_name: String) -> Post {
    Post {
        id: row.id,
        author_id: UserId::from_uuid(row.author_id),
        author_name,
        content: row.content,
        image_url: row.image_url,
        like_count: count_u32(row.like_count),
        comment_count: count_u32(row.comment_count),
        created_at: row.created_at,
    }
}

fn to_comment(row: CommentRow, author_name: String) -> Comment {
    Comment {
        id: row.id,
        post_id: row.post_id,
        author_id: UserId::from_uuid(row.author_id),
        author_name,
        content: row.content,
        created_at: row.created_at,
    }
}

fn page_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl SocialRepository for DieselSocialRepository {
    async fn create_post(
        &self,
        author_id: &UserId,
        content: &Content,
        image_url: Option<String>,
    ) -> Result<Post, SocialPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = PostRow {
            id: Uuid::new_v4(),
            author_id: *author_id.as_uuid(),
            content: content.as_str().to_owned(),
            image_url,
            like_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        };
        let stored: PostRow = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await?;
        let author_name: String = users::table
            .find(stored.author_id)
            .select(users::display_name)
            .first(&mut conn)
            .await?;
        Ok(to_post(stored, author_name))
    }

    async fn feed(
        &self,
        after: Option<TimelineKey>,
        limit: usize,
    ) -> Result<Vec<Post>, SocialPersistenceError> {
        let mut conn = self.pool.get().await?;
        let mut query = posts::table
            .inner_join(users::table)
            .select((PostRow::as_select(), users::display_name))
            .order((posts::created_at.desc(), posts::id.desc()))
            .limit(page_limit(limit))
            .into_boxed();
        if let Some(key) = after {
            query = query.filter(
                posts::created_at.lt(key.created_at).or(posts::created_at
                    .eq(key.created_at)
                    .and(posts::id.lt(key.id))),
            );
        }
        let rows: Vec<(PostRow, String)> = query.load(&mut conn).await?;
        Ok(rows
            .into_iter()
            .map(|(row, name)| to_post(row, name))
            .collect())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, SocialPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<(PostRow, String)> = posts::table
            .inner_join(users::table)
            .filter(posts::id.eq(id))
            .select((PostRow::as_select(), users::display_name))
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(|(row, name)| to_post(row, name)))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, SocialPersistenceError> {
        let mut conn = self.pool.get().await?;
        let deleted = diesel::delete(posts::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }

    async fn toggle_like(
        &self,
        user_id: &UserId,
        post_id: Uuid,
    ) -> Result<Option<LikeOutcome>, SocialPersistenceError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let user = *user_id.as_uuid();
        let mut conn = self.pool.get().await?;

        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let post: Option<Uuid> = posts::table
                        .find(post_id)
                        .select(posts::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if post.is_none() {
                        return Ok(None);
                    }

                    let removed = diesel::delete(
                        post_likes::table
                            .filter(post_likes::post_id.eq(post_id))
                            .filter(post_likes::user_id.eq(user)),
                    )
                    .execute(conn)
                    .await?;

                    let (liked, delta) = if removed > 0 {
                        (false, -1)
                    } else {
                        diesel::insert_into(post_likes::table)
                            .values((
                                post_likes::post_id.eq(post_id),
                                post_likes::user_id.eq(user),
                                post_likes::created_at.eq(Utc::now()),
                            ))
                            .execute(conn)
                            .await?;
                        (true, 1)
                    };

                    let like_count: i32 = diesel::update(posts::table.find(post_id))
                        .set(posts::like_count.eq(posts::like_count + delta))
                        .returning(posts::like_count)
                        .get_result(conn)
                        .await?;
                    Ok(Some(LikeOutcome {
                        liked,
                        like_count: count_u32(like_count),
                    }))
                }
                .scope_boxed()
            })
            .await?;
        Ok(outcome)
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: &UserId,
        content: &Content,
    ) -> Result<Option<Comment>, SocialPersistenceError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let row = CommentRow {
            id: Uuid::new_v4(),
            post_id,
            author_id: *author_id.as_uuid(),
            content: content.as_str().to_owned(),
            created_at: Utc::now(),
        };
        let mut conn = self.pool.get().await?;

        let comment = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let bumped: Option<Uuid> = diesel::update(posts::table.find(post_id))
                        .set(posts::comment_count.eq(posts::comment_count + 1))
                        .returning(posts::id)
                        .get_result(conn)
                        .await
                        .optional()?;
                    if bumped.is_none() {
                        return Ok(None);
                    }

                    let stored: CommentRow = diesel::insert_into(comments::table)
                        .values(&row)
                        .returning(CommentRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let author_name: String = users::table
                        .find(stored.author_id)
                        .select(users::display_name)
                        .first(conn)
                        .await?;
                    Ok(Some(to_comment(stored, author_name)))
                }
                .scope_boxed()
            })
            .await?;
        Ok(comment)
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, SocialPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<(CommentRow, String)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), users::display_name))
            .load(&mut conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(row, name)| to_comment(row, name))
            .collect())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, SocialPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<(CommentRow, String)> = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(id))
            .select((CommentRow::as_select(), users::display_name))
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(|(row, name)| to_comment(row, name)))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, SocialPersistenceError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await?;
        let deleted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let post_id: Option<Uuid> = diesel::delete(comments::table.find(id))
                        .returning(comments::post_id)
                        .get_result(conn)
                        .await
                        .optional()?;
                    let Some(post_id) = post_id else {
                        return Ok(false);
                    };
                    diesel::update(posts::table.find(post_id))
                        .set(posts::comment_count.eq(posts::comment_count - 1))
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await?;
        Ok(deleted)
    }

    async fn delete_posts_before(&self, cutoff: DateTime<Utc>) -> Result<u64, SocialPersistenceError> {
        let mut conn = self.pool.get().await?;
        let deleted = diesel::delete(posts::table.filter(posts::created_at.lt(cutoff)))
            .execute(&mut conn)
            .await?;
        Ok(rows_u64(deleted))
    }
}
