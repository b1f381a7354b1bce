//! Social feed handlers.
//!
//! ```text
//! GET    /api/v1/posts?cursor=&limit=
//! POST   /api/v1/posts
//! GET    /api/v1/posts/{id}
//! DELETE /api/v1/posts/{id}
//! POST   /api/v1/posts/{id}/like
//! GET    /api/v1/posts/{id}/comments
//! POST   /api/v1/posts/{id}/comments
//! DELETE /api/v1/comments/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::formatting::normalize_optional_url;
use crate::domain::{Content, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::paging::{PageQuery, PagedResponse};
use crate::inbound::http::schemas::{CommentSchema, ErrorSchema, LikeOutcomeSchema, PostSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_uuid, require};

const ID: FieldName = FieldName::new("id");
const CONTENT: FieldName = FieldName::new("content");

/// New post. `imageUrl` gets `https://` when the scheme is missing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[schema(example = "Fresh taper for the weekend")]
    pub content: Option<String>,
    pub image_url: Option<String>,
}

/// New comment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentRequest {
    pub content: Option<String>,
}

fn parse_content(raw: Option<String>) -> Result<Content, Error> {
    let raw = require(raw, CONTENT)?;
    Content::new(&raw).map_err(|err| invalid_field_error(CONTENT, err))
}

/// Newest posts first.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PageQuery),
    responses(
        (status = 200, description = "Feed page with `items`, `nextCursor` and `links`"),
        (status = 400, description = "Invalid cursor or limit", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    request: HttpRequest,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page_request = query.into_inner().into_request()?;
    let limit = page_request.limit();
    let page = state.social.feed(page_request).await?;
    Ok(HttpResponse::Ok().json(PagedResponse::new(page, &request, limit)))
}

/// Publish a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let PostRequest { content, image_url } = payload.into_inner();
    let content = parse_content(content)?;
    let image_url = normalize_optional_url(image_url.as_deref())
        .map_err(|err| invalid_field_error(FieldName::new("imageUrl"), err))?;
    let post = state.social.create_post(&caller, content, image_url).await?;
    Ok(HttpResponse::Created().json(post))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "getPost",
    security([])
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, ID)?;
    let post = state.social.get_post(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post with its likes and comments. Author or admin.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, ID)?;
    state.social.delete_post(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Like a post, or remove an existing like.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Like state after the toggle", body = LikeOutcomeSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "toggleLike"
)]
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, ID)?;
    let outcome = state.social.toggle_like(&caller, id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Comments on a post, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Comments", body = [CommentSchema]),
        (status = 404, description = "Unknown post", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "listComments",
    security([])
)]
#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, ID)?;
    let comments = state.social.list_comments(id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = String, Path, description = "Post id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "addComment"
)]
#[post("/posts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let post_id = parse_uuid(&path, ID)?;
    let content = parse_content(payload.into_inner().content)?;
    let comment = state.social.add_comment(&caller, post_id, content).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Delete a comment. Author or admin.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = String, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown comment", body = ErrorSchema)
    ),
    tags = ["social"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, ID)?;
    state.social.delete_comment(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
