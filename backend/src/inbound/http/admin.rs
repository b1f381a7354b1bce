//! Admin reporting and maintenance handlers.
//!
//! ```text
//! GET  /api/v1/admin/reports/summary?from=&to=
//! POST /api/v1/admin/maintenance/sweep
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_store_header;
use crate::inbound::http::schemas::{ErrorSchema, SummaryReportSchema, SweepReportSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_rfc3339_timestamp, require};

/// Report window `[from, to)`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// RFC 3339 lower bound, inclusive.
    pub from: Option<String>,
    /// RFC 3339 upper bound, exclusive.
    pub to: Option<String>,
}

/// Aggregate counts, revenue and top providers. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/admin/reports/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Summary report", body = SummaryReportSchema),
        (status = 400, description = "Invalid range", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "summaryReport"
)]
#[get("/admin/reports/summary")]
pub async fn summary_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SummaryQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let SummaryQuery { from, to } = query.into_inner();
    let from_field = FieldName::new("from");
    let to_field = FieldName::new("to");
    let from = parse_rfc3339_timestamp(&require(from, from_field)?, from_field)?;
    let to = parse_rfc3339_timestamp(&require(to, to_field)?, to_field)?;
    let report = state.reports.summary(&caller, from, to).await?;
    Ok(HttpResponse::Ok()
        .insert_header(no_store_header())
        .json(report))
}

/// Run the retention sweep now. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/admin/maintenance/sweep",
    responses(
        (status = 200, description = "Rows affected", body = SweepReportSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "runSweep"
)]
#[post("/admin/maintenance/sweep")]
pub async fn run_sweep(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let report = state.maintenance.sweep(&caller).await?;
    info!(
        actor = %caller.user_id,
        appointments_deleted = report.appointments_deleted,
        posts_deleted = report.posts_deleted,
        promotions_expired = report.promotions_expired,
        "maintenance sweep requested"
    );
    Ok(HttpResponse::Ok().json(report))
}
