//! Promotion handlers.
//!
//! ```text
//! GET  /api/v1/promotions?barberId=
//! POST /api/v1/promotions
//! POST /api/v1/promotions/{id}/deactivate
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, PromotionDraft, PromotionValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PromotionSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_optional_user_id, parse_rfc3339_timestamp, parse_uuid,
    require,
};

/// New promotion. Providers always target themselves; admins may omit
/// `barberId` for a shop-wide discount.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRequest {
    pub barber_id: Option<String>,
    #[schema(example = "Spring fades")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = 15)]
    pub discount_percent: Option<i64>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
}

/// Optional provider filter. Shop-wide promotions are always included.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PromotionsQuery {
    pub barber_id: Option<String>,
}

fn map_promotion_error(err: PromotionValidationError) -> Error {
    let field = match err {
        PromotionValidationError::EmptyTitle | PromotionValidationError::TitleTooLong { .. } => {
            "title"
        }
        PromotionValidationError::DiscountOutOfRange { .. } => "discountPercent",
        PromotionValidationError::EmptyPeriod => "endsAt",
    };
    invalid_field_error(FieldName::new(field), err)
}

fn parse_promotion(payload: PromotionRequest) -> Result<PromotionDraft, Error> {
    let title_field = FieldName::new("title");
    let percent_field = FieldName::new("discountPercent");
    let starts_field = FieldName::new("startsAt");
    let ends_field = FieldName::new("endsAt");
    let barber_id = parse_optional_user_id(payload.barber_id.as_deref(), FieldName::new("barberId"))?;
    let title = require(payload.title, title_field)?;
    let percent = require(payload.discount_percent, percent_field)?;
    let starts_at = parse_rfc3339_timestamp(&require(payload.starts_at, starts_field)?, starts_field)?;
    let ends_at = parse_rfc3339_timestamp(&require(payload.ends_at, ends_field)?, ends_field)?;
    PromotionDraft::try_new(
        barber_id,
        &title,
        payload.description.as_deref(),
        percent,
        starts_at,
        ends_at,
    )
    .map_err(map_promotion_error)
}

/// Promotions live right now.
#[utoipa::path(
    get,
    path = "/api/v1/promotions",
    params(PromotionsQuery),
    responses((status = 200, description = "Live promotions", body = [PromotionSchema])),
    tags = ["promotions"],
    operation_id = "listPromotions",
    security([])
)]
#[get("/promotions")]
pub async fn list_promotions(
    state: web::Data<HttpState>,
    query: web::Query<PromotionsQuery>,
) -> ApiResult<HttpResponse> {
    let barber_id = parse_optional_user_id(query.barber_id.as_deref(), FieldName::new("barberId"))?;
    let promotions = state.promotions.list_active(barber_id).await?;
    Ok(HttpResponse::Ok().json(promotions))
}

/// Create a promotion.
#[utoipa::path(
    post,
    path = "/api/v1/promotions",
    request_body = PromotionRequest,
    responses(
        (status = 201, description = "Promotion created", body = PromotionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Provider or admin role required", body = ErrorSchema)
    ),
    tags = ["promotions"],
    operation_id = "createPromotion"
)]
#[post("/promotions")]
pub async fn create_promotion(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PromotionRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let draft = parse_promotion(payload.into_inner())?;
    let promotion = state.promotions.create(&caller, draft).await?;
    Ok(HttpResponse::Created().json(promotion))
}

/// Switch a promotion off. Owner or admin.
#[utoipa::path(
    post,
    path = "/api/v1/promotions/{id}/deactivate",
    params(("id" = String, Path, description = "Promotion id")),
    responses(
        (status = 200, description = "Deactivated promotion", body = PromotionSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown promotion", body = ErrorSchema)
    ),
    tags = ["promotions"],
    operation_id = "deactivatePromotion"
)]
#[post("/promotions/{id}/deactivate")]
pub async fn deactivate_promotion(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let promotion = state.promotions.deactivate(&caller, id).await?;
    info!(promotion_id = %promotion.id, actor = %caller.user_id, "promotion deactivated");
    Ok(HttpResponse::Ok().json(promotion))
}
