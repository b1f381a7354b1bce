//! Booking, lifecycle and calendar export handlers.
//!
//! ```text
//! POST /api/v1/appointments
//! GET  /api/v1/appointments?from=&to=
//! GET  /api/v1/appointments/export.csv?from=&to=
//! GET  /api/v1/appointments/{id}
//! GET  /api/v1/appointments/{id}/calendar.ics
//! POST /api/v1/appointments/{id}/confirm
//! POST /api/v1/appointments/{id}/complete
//! POST /api/v1/appointments/{id}/cancel
//! POST /api/v1/appointments/{id}/no-show
//! GET  /api/v1/providers/{id}/calendar.ics
//! ```
//!
//! `export.csv` must be registered ahead of `{id}` so the literal segment
//! wins.

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{BookingRequest, DateRange};
use crate::domain::{Appointment, Error, Principal};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{no_store_header, private_no_cache_header};
use crate::inbound::http::schemas::{AppointmentDetailsSchema, AppointmentSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_rfc3339_timestamp, parse_optional_user_id, parse_rfc3339_timestamp,
    parse_user_id, parse_uuid, require,
};

const ID: FieldName = FieldName::new("id");
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Booking payload. `clientId` is only honoured for admins.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub barber_id: Option<String>,
    pub service_id: Option<String>,
    #[schema(example = "2026-03-03T09:00:00Z")]
    pub starts_at: Option<String>,
    pub notes: Option<String>,
    pub client_id: Option<String>,
}

/// Optional `[from, to)` window on start times.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// RFC 3339 lower bound, inclusive.
    pub from: Option<String>,
    /// RFC 3339 upper bound, exclusive.
    pub to: Option<String>,
}

impl RangeQuery {
    fn into_range(self) -> Result<DateRange, Error> {
        Ok(DateRange {
            from: parse_optional_rfc3339_timestamp(self.from.as_deref(), FieldName::new("from"))?,
            to: parse_optional_rfc3339_timestamp(self.to.as_deref(), FieldName::new("to"))?,
        })
    }
}

fn parse_booking(payload: BookRequest) -> Result<BookingRequest, Error> {
    let barber_field = FieldName::new("barberId");
    let service_field = FieldName::new("serviceId");
    let starts_field = FieldName::new("startsAt");
    let barber_id = parse_user_id(&require(payload.barber_id, barber_field)?, barber_field)?;
    let service_id = parse_uuid(&require(payload.service_id, service_field)?, service_field)?;
    let starts_at = parse_rfc3339_timestamp(&require(payload.starts_at, starts_field)?, starts_field)?;
    let client_id = parse_optional_user_id(payload.client_id.as_deref(), FieldName::new("clientId"))?;
    Ok(BookingRequest {
        client_id,
        barber_id,
        service_id,
        starts_at,
        notes: payload.notes,
    })
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    Confirm,
    Complete,
    Cancel,
    NoShow,
}

async fn apply_transition(
    state: &HttpState,
    caller: &Principal,
    raw_id: &str,
    transition: Transition,
) -> ApiResult<Appointment> {
    let id = parse_uuid(raw_id, ID)?;
    let bookings = &state.bookings;
    let appointment = match transition {
        Transition::Confirm => bookings.confirm(caller, id).await?,
        Transition::Complete => bookings.complete(caller, id).await?,
        Transition::Cancel => bookings.cancel(caller, id).await?,
        Transition::NoShow => bookings.mark_no_show(caller, id).await?,
    };
    info!(
        appointment_id = %appointment.id,
        status = appointment.status.as_str(),
        actor = %caller.user_id,
        "appointment status changed"
    );
    Ok(appointment)
}

fn calendar_response(body: String, filename: &str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, ICS_CONTENT_TYPE))
        .insert_header((CONTENT_DISPOSITION, format!("inline; filename=\"{filename}\"")))
        .insert_header(private_no_cache_header())
        .body(body)
}

/// Book a service slot.
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentSchema),
        (status = 400, description = "Invalid request or slot outside availability", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown provider or service", body = ErrorSchema),
        (status = 409, description = "Slot already taken", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "bookAppointment"
)]
#[post("/appointments")]
pub async fn book(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let request = parse_booking(payload.into_inner())?;
    let appointment = state.bookings.book(&caller, request).await?;
    info!(
        appointment_id = %appointment.id,
        barber_id = %appointment.barber_id,
        client_id = %appointment.client_id,
        "appointment booked"
    );
    Ok(HttpResponse::Created().json(appointment))
}

/// Appointments visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    params(RangeQuery),
    responses(
        (status = 200, description = "Appointments", body = [AppointmentDetailsSchema]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments"
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RangeQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let range = query.into_inner().into_range()?;
    let appointments = state.bookings.list_mine(&caller, range).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(appointments))
}

/// CSV export. Providers get their own rows, admins everything.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/export.csv",
    params(RangeQuery),
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 403, description = "Provider or admin role required", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "exportAppointments"
)]
#[get("/appointments/export.csv")]
pub async fn export_csv(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RangeQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let range = query.into_inner().into_range()?;
    let csv = state.bookings.export_csv(&caller, range).await?;
    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, CSV_CONTENT_TYPE))
        .insert_header((CONTENT_DISPOSITION, "attachment; filename=\"appointments.csv\""))
        .insert_header(no_store_header())
        .body(csv))
}

/// One appointment with names and price.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentDetailsSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Unknown appointment", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "getAppointment"
)]
#[get("/appointments/{id}")]
pub async fn get_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, ID)?;
    let details = state.bookings.get(&caller, id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(details))
}

/// Single appointment as an iCalendar event.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}/calendar.ics",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "iCalendar document", content_type = "text/calendar", body = String),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Unknown appointment", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "appointmentCalendar"
)]
#[get("/appointments/{id}/calendar.ics")]
pub async fn appointment_calendar(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id: Uuid = parse_uuid(&path, ID)?;
    let ics = state.bookings.appointment_ics(&caller, id).await?;
    Ok(calendar_response(ics, &format!("appointment-{id}.ics")))
}

/// A provider's upcoming appointments as a calendar feed.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}/calendar.ics",
    params(("id" = String, Path, description = "Provider user id")),
    responses(
        (status = 200, description = "iCalendar feed", content_type = "text/calendar", body = String),
        (status = 403, description = "Not the owner", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "providerCalendar"
)]
#[get("/providers/{id}/calendar.ics")]
pub async fn provider_calendar(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let barber_id = parse_user_id(&path, ID)?;
    let ics = state.bookings.provider_calendar_ics(&caller, barber_id).await?;
    Ok(calendar_response(ics, "calendar.ics"))
}

/// Provider accepts a pending appointment.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/confirm",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Confirmed", body = AppointmentSchema),
        (status = 403, description = "Not the provider", body = ErrorSchema),
        (status = 409, description = "Invalid transition", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "confirmAppointment"
)]
#[post("/appointments/{id}/confirm")]
pub async fn confirm(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let appointment = apply_transition(&state, &caller, &path, Transition::Confirm).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

/// Provider marks a confirmed appointment as done.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/complete",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Completed", body = AppointmentSchema),
        (status = 403, description = "Not the provider", body = ErrorSchema),
        (status = 409, description = "Invalid transition", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "completeAppointment"
)]
#[post("/appointments/{id}/complete")]
pub async fn complete(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let appointment = apply_transition(&state, &caller, &path, Transition::Complete).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

/// Either participant cancels.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/cancel",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Cancelled", body = AppointmentSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 409, description = "Invalid transition", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "cancelAppointment"
)]
#[post("/appointments/{id}/cancel")]
pub async fn cancel(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let appointment = apply_transition(&state, &caller, &path, Transition::Cancel).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

/// Provider records that the client did not attend.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/no-show",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Marked as no-show", body = AppointmentSchema),
        (status = 403, description = "Not the provider", body = ErrorSchema),
        (status = 409, description = "Invalid transition", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "markNoShow"
)]
#[post("/appointments/{id}/no-show")]
pub async fn mark_no_show(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let appointment = apply_transition(&state, &caller, &path, Transition::NoShow).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[cfg(test)]
#[path = "appointments_tests.rs"]
mod tests;
