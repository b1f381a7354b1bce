//! Direct message handlers.
//!
//! ```text
//! POST /api/v1/messages
//! GET  /api/v1/messages/unread-count
//! GET  /api/v1/conversations/{userId}?cursor=&limit=
//! POST /api/v1/conversations/{userId}/read
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Content;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::paging::{PageQuery, PagedResponse};
use crate::inbound::http::schemas::{ErrorSchema, MessageSchema, UnreadCountSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_user_id, require};

const USER_ID: FieldName = FieldName::new("userId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_id: Option<String>,
    #[schema(example = "Running ten minutes late")]
    pub body: Option<String>,
}

/// Number of messages marked read.
#[derive(Debug, Serialize, ToSchema)]
pub struct MarkedRead {
    pub marked: u64,
}

/// Send a direct message.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageSchema),
        (status = 400, description = "Invalid request or message to self", body = ErrorSchema),
        (status = 404, description = "Unknown recipient", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let SendMessageRequest { recipient_id, body } = payload.into_inner();
    let recipient_field = FieldName::new("recipientId");
    let body_field = FieldName::new("body");
    let recipient = parse_user_id(&require(recipient_id, recipient_field)?, recipient_field)?;
    let body = Content::new(&require(body, body_field)?)
        .map_err(|err| invalid_field_error(body_field, err))?;
    let message = state.messaging.send(&caller, recipient, body).await?;
    Ok(HttpResponse::Created().json(message))
}

/// Messages addressed to the caller and not yet read.
#[utoipa::path(
    get,
    path = "/api/v1/messages/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "unreadCount"
)]
#[get("/messages/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let count = state.messaging.unread_count(&caller).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(count))
}

/// Conversation with another user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/conversations/{userId}",
    params(("userId" = String, Path, description = "Other participant"), PageQuery),
    responses(
        (status = 200, description = "Message page with `items`, `nextCursor` and `links`"),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "conversation"
)]
#[get("/conversations/{user_id}")]
pub async fn conversation(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let other = parse_user_id(&path, USER_ID)?;
    let page_request = query.into_inner().into_request()?;
    let limit = page_request.limit();
    let page = state.messaging.conversation(&caller, other, page_request).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(PagedResponse::new(page, &request, limit)))
}

/// Mark every message from `userId` to the caller as read.
#[utoipa::path(
    post,
    path = "/api/v1/conversations/{userId}/read",
    params(("userId" = String, Path, description = "Other participant")),
    responses(
        (status = 200, description = "Messages marked", body = MarkedRead),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["messages"],
    operation_id = "markConversationRead"
)]
#[post("/conversations/{user_id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let other = parse_user_id(&path, USER_ID)?;
    let marked = state.messaging.mark_read(&caller, other).await?;
    Ok(HttpResponse::Ok().json(MarkedRead { marked }))
}
