//! Provider directory, menus, availability and link-click handlers.
//!
//! ```text
//! GET    /api/v1/providers
//! GET    /api/v1/providers/{id}
//! PUT    /api/v1/providers/me/profile
//! POST   /api/v1/providers/me/services
//! PATCH  /api/v1/services/{id}
//! DELETE /api/v1/services/{id}
//! PUT    /api/v1/providers/me/availability
//! GET    /api/v1/providers/{id}/slots?serviceId=&date=
//! POST   /api/v1/providers/{id}/clicks
//! GET    /api/v1/providers/{id}/clicks?since=
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::formatting::parse_time_of_day;
use crate::domain::{
    AvailabilityWindow, DayOfWeek, Error, ProviderProfile, ProviderValidationError,
    ServiceDraft, ServicePatch, SocialPlatform,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    AvailabilityWindowSchema, ClickSummarySchema, ErrorSchema, ProviderDetailSchema,
    ProviderProfileSchema, ProviderSchema, ServiceOfferingSchema, SlotSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_date, parse_optional_rfc3339_timestamp, parse_user_id,
    parse_uuid, require,
};

const ID: FieldName = FieldName::new("id");

/// Bio and social links. Links without a scheme get `https://`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub bio: Option<String>,
    #[schema(example = "instagram.com/jo.cuts")]
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website_url: Option<String>,
}

/// New menu entry.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    #[schema(example = "Skin fade")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(example = 3000)]
    pub price_cents: Option<i64>,
    #[schema(example = 45)]
    pub duration_minutes: Option<u32>,
}

/// Partial menu update; absent fields are unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatchRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_minutes: Option<u32>,
}

/// Day given as `0`-`6` (Sunday first) or a day name.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum DayInput {
    Index(i64),
    Name(String),
}

/// One window of the weekly template. Times accept `17:30` or `5:30pm`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowRequest {
    pub day_of_week: DayInput,
    #[schema(example = "9am")]
    pub start: String,
    #[schema(example = "17:30")]
    pub end: String,
}

/// Replacement weekly template.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AvailabilityRequest {
    pub windows: Vec<WindowRequest>,
}

/// Slot lookup for one service on one date.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SlotsQuery {
    /// Service on the provider's menu.
    pub service_id: Option<String>,
    /// Calendar date, `YYYY-MM-DD`, in UTC.
    pub date: Option<String>,
}

/// Click on a provider's social link.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ClickRequest {
    #[schema(example = "instagram")]
    pub platform: String,
}

/// Lower bound for the click summary.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClicksQuery {
    /// RFC 3339 timestamp; omit for all time.
    pub since: Option<String>,
}

fn map_provider_error(err: ProviderValidationError) -> Error {
    let field = match &err {
        ProviderValidationError::BioTooLong { .. } => "bio",
        ProviderValidationError::Link { field, .. } => *field,
        ProviderValidationError::EmptyServiceName
        | ProviderValidationError::ServiceNameTooLong { .. } => "name",
        ProviderValidationError::ServiceDescriptionTooLong { .. } => "description",
        ProviderValidationError::NegativePrice => "priceCents",
        ProviderValidationError::DurationOutOfRange { .. } => "durationMinutes",
    };
    invalid_field_error(FieldName::new(field), err)
}

fn window_error(index: usize, reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(reason.to_string()).with_details(json!({
        "field": "windows",
        "index": index,
        "code": "invalid_window",
    }))
}

fn parse_day(input: &DayInput) -> Result<DayOfWeek, String> {
    match input {
        DayInput::Index(value) => DayOfWeek::from_index(*value).map_err(|err| err.to_string()),
        DayInput::Name(name) => DayOfWeek::ALL
            .into_iter()
            .find(|day| day.to_string().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| format!("unknown day of week '{name}'")),
    }
}

fn parse_window(index: usize, window: &WindowRequest) -> Result<AvailabilityWindow, Error> {
    let day = parse_day(&window.day_of_week).map_err(|reason| window_error(index, reason))?;
    let start = parse_time_of_day(&window.start).map_err(|err| window_error(index, err))?;
    let end = parse_time_of_day(&window.end).map_err(|err| window_error(index, err))?;
    AvailabilityWindow::new(day, start, end).map_err(|err| window_error(index, err))
}

fn parse_service(payload: ServiceRequest) -> Result<ServiceDraft, Error> {
    let name = require(payload.name, FieldName::new("name"))?;
    let price_cents = require(payload.price_cents, FieldName::new("priceCents"))?;
    let duration = require(payload.duration_minutes, FieldName::new("durationMinutes"))?;
    ServiceDraft::try_new(&name, payload.description.as_deref(), price_cents, duration)
        .map_err(map_provider_error)
}

/// Public provider directory.
#[utoipa::path(
    get,
    path = "/api/v1/providers",
    responses((status = 200, description = "Barbers and stylists", body = [ProviderSchema])),
    tags = ["providers"],
    operation_id = "listProviders",
    security([])
)]
#[get("/providers")]
pub async fn list_providers(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let providers = state.providers.list_providers().await?;
    Ok(HttpResponse::Ok().json(providers))
}

/// Provider page with menu and weekly availability.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}",
    params(("id" = String, Path, description = "Provider user id")),
    responses(
        (status = 200, description = "Provider detail", body = ProviderDetailSchema),
        (status = 404, description = "Unknown provider", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "getProvider",
    security([])
)]
#[get("/providers/{id}")]
pub async fn get_provider(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, ID)?;
    let detail = state.providers.get_provider(id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Create or replace the caller's profile.
#[utoipa::path(
    put,
    path = "/api/v1/providers/me/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Stored profile", body = ProviderProfileSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Provider role required", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "upsertProviderProfile"
)]
#[put("/providers/me/profile")]
pub async fn upsert_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let profile = ProviderProfile::try_new(
        payload.bio.as_deref().unwrap_or_default(),
        payload.instagram_url.as_deref(),
        payload.tiktok_url.as_deref(),
        payload.facebook_url.as_deref(),
        payload.website_url.as_deref(),
    )
    .map_err(map_provider_error)?;
    let stored = state.providers.upsert_profile(&caller, profile).await?;
    Ok(HttpResponse::Ok().json(stored))
}

/// Add a service to the caller's menu.
#[utoipa::path(
    post,
    path = "/api/v1/providers/me/services",
    request_body = ServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ServiceOfferingSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Provider role required", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "createService"
)]
#[post("/providers/me/services")]
pub async fn create_service(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ServiceRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let draft = parse_service(payload.into_inner())?;
    let service = state.providers.create_service(&caller, draft).await?;
    info!(service_id = %service.id, barber_id = %service.barber_id, "service created");
    Ok(HttpResponse::Created().json(service))
}

/// Update a menu entry. Owner or admin.
#[utoipa::path(
    patch,
    path = "/api/v1/services/{id}",
    params(("id" = String, Path, description = "Service id")),
    request_body = ServicePatchRequest,
    responses(
        (status = 200, description = "Updated service", body = ServiceOfferingSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown service", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "updateService"
)]
#[patch("/services/{id}")]
pub async fn update_service(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ServicePatchRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, ID)?;
    let ServicePatchRequest {
        name,
        description,
        price_cents,
        duration_minutes,
    } = payload.into_inner();
    let patch = ServicePatch {
        name,
        description,
        price_cents,
        duration_minutes,
    };
    let service = state.providers.update_service(&caller, id, patch).await?;
    Ok(HttpResponse::Ok().json(service))
}

/// Remove a menu entry. Owner or admin.
#[utoipa::path(
    delete,
    path = "/api/v1/services/{id}",
    params(("id" = String, Path, description = "Service id")),
    responses(
        (status = 204, description = "Service removed"),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown service", body = ErrorSchema),
        (status = 409, description = "Service has appointments", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "deleteService"
)]
#[delete("/services/{id}")]
pub async fn delete_service(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, ID)?;
    state.providers.delete_service(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace the caller's weekly availability.
#[utoipa::path(
    put,
    path = "/api/v1/providers/me/availability",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Stored template", body = [AvailabilityWindowSchema]),
        (status = 400, description = "Invalid window", body = ErrorSchema),
        (status = 403, description = "Provider role required", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "setAvailability"
)]
#[put("/providers/me/availability")]
pub async fn set_availability(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AvailabilityRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let windows = payload
        .windows
        .iter()
        .enumerate()
        .map(|(index, window)| parse_window(index, window))
        .collect::<Result<Vec<_>, _>>()?;
    let stored = state.providers.set_availability(&caller, windows).await?;
    Ok(HttpResponse::Ok().json(stored))
}

/// Open slots for a service on a date.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}/slots",
    params(("id" = String, Path, description = "Provider user id"), SlotsQuery),
    responses(
        (status = 200, description = "Bookable slots", body = [SlotSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown service", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "openSlots",
    security([])
)]
#[get("/providers/{id}/slots")]
pub async fn open_slots(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<SlotsQuery>,
) -> ApiResult<HttpResponse> {
    let barber_id = parse_user_id(&path, ID)?;
    let SlotsQuery { service_id, date } = query.into_inner();
    let service_field = FieldName::new("serviceId");
    let date_field = FieldName::new("date");
    let service_id = parse_uuid(&require(service_id, service_field)?, service_field)?;
    let date = parse_date(&require(date, date_field)?, date_field)?;
    let slots = state.providers.open_slots(barber_id, service_id, date).await?;
    Ok(HttpResponse::Ok().json(slots))
}

/// Record a click on one of the provider's links.
#[utoipa::path(
    post,
    path = "/api/v1/providers/{id}/clicks",
    params(("id" = String, Path, description = "Provider user id")),
    request_body = ClickRequest,
    responses(
        (status = 204, description = "Click recorded"),
        (status = 400, description = "Unknown platform", body = ErrorSchema),
        (status = 404, description = "Unknown provider", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "recordClick",
    security([])
)]
#[post("/providers/{id}/clicks")]
pub async fn record_click(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ClickRequest>,
) -> ApiResult<HttpResponse> {
    let barber_id = parse_user_id(&path, ID)?;
    let platform = payload
        .platform
        .parse::<SocialPlatform>()
        .map_err(|err| invalid_field_error(FieldName::new("platform"), err))?;
    state.providers.record_click(barber_id, platform).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Click counts per platform. Owner or admin.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}/clicks",
    params(("id" = String, Path, description = "Provider user id"), ClicksQuery),
    responses(
        (status = 200, description = "Click summary", body = ClickSummarySchema),
        (status = 403, description = "Not the owner", body = ErrorSchema)
    ),
    tags = ["providers"],
    operation_id = "clickSummary"
)]
#[get("/providers/{id}/clicks")]
pub async fn click_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<ClicksQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let barber_id = parse_user_id(&path, ID)?;
    let since = parse_optional_rfc3339_timestamp(query.since.as_deref(), FieldName::new("since"))?;
    let summary = state
        .providers
        .click_summary(&caller, barber_id, since)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
#[path = "providers_tests.rs"]
mod tests;
