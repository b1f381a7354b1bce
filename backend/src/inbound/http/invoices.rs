//! Invoice handlers.
//!
//! ```text
//! POST /api/v1/invoices
//! GET  /api/v1/invoices
//! GET  /api/v1/invoices/{id}
//! POST /api/v1/invoices/{id}/pay
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{ErrorSchema, InvoiceSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require};

const ID: FieldName = FieldName::new("id");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub appointment_id: Option<String>,
}

/// Invoice a completed appointment. The provider or an admin may do this.
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice issued", body = InvoiceSchema),
        (status = 400, description = "Appointment not completed", body = ErrorSchema),
        (status = 403, description = "Not the provider", body = ErrorSchema),
        (status = 409, description = "Appointment already invoiced", body = ErrorSchema)
    ),
    tags = ["invoices"],
    operation_id = "createInvoice"
)]
#[post("/invoices")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateInvoiceRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let field = FieldName::new("appointmentId");
    let appointment_id = parse_uuid(&require(payload.into_inner().appointment_id, field)?, field)?;
    let invoice = state
        .invoicing
        .create_for_appointment(&caller, appointment_id)
        .await?;
    info!(
        invoice_id = %invoice.id,
        total_cents = invoice.totals.total_cents,
        "invoice issued"
    );
    Ok(HttpResponse::Created().json(invoice))
}

/// Invoices where the caller is client or provider; admins see all.
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    responses(
        (status = 200, description = "Invoices", body = [InvoiceSchema]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["invoices"],
    operation_id = "listInvoices"
)]
#[get("/invoices")]
pub async fn list_invoices(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let invoices = state.invoicing.list_mine(&caller).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(invoices))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice", body = InvoiceSchema),
        (status = 403, description = "Not a participant", body = ErrorSchema),
        (status = 404, description = "Unknown invoice", body = ErrorSchema)
    ),
    tags = ["invoices"],
    operation_id = "getInvoice"
)]
#[get("/invoices/{id}")]
pub async fn get_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, ID)?;
    let invoice = state.invoicing.get(&caller, id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(invoice))
}

/// Record payment. Provider or admin.
#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/pay",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice paid", body = InvoiceSchema),
        (status = 403, description = "Not the provider", body = ErrorSchema),
        (status = 409, description = "Already paid", body = ErrorSchema)
    ),
    tags = ["invoices"],
    operation_id = "payInvoice"
)]
#[post("/invoices/{id}/pay")]
pub async fn pay_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, ID)?;
    let invoice = state.invoicing.mark_paid(&caller, id).await?;
    info!(invoice_id = %invoice.id, actor = %caller.user_id, "invoice paid");
    Ok(HttpResponse::Ok().json(invoice))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::MockInvoicing;
    use crate::domain::test_support::{fixture_now, principal};
    use crate::domain::{Error, Invoice, InvoiceStatus, InvoiceTotals, LineItem, Role, UserId};
    use crate::inbound::http::test_utils::{login_request, mock_state, session_cookie, test_app};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/api/v1")
                .service(create_invoice)
                .service(list_invoices)
                .service(get_invoice)
                .service(pay_invoice),
        );
    }

    fn state_with(invoicing: MockInvoicing) -> HttpState {
        HttpState {
            invoicing: Arc::new(invoicing),
            ..mock_state()
        }
    }

    fn invoice(appointment_id: Uuid, barber_id: UserId, discount: Option<u8>) -> Invoice {
        let line_items = vec![LineItem {
            description: "Skin fade".into(),
            quantity: 1,
            unit_price_cents: 3000,
        }];
        let totals = InvoiceTotals::compute(&line_items, discount);
        Invoice {
            id: Uuid::new_v4(),
            appointment_id: Some(appointment_id),
            client_id: UserId::random(),
            barber_id,
            status: InvoiceStatus::Issued,
            line_items,
            totals,
            issued_at: fixture_now(),
            paid_at: None,
        }
    }

    #[actix_web::test]
    async fn issuing_returns_flattened_totals() {
        let barber = principal(Role::Barber);
        let appointment_id = Uuid::new_v4();
        let mut invoicing = MockInvoicing::new();
        invoicing
            .expect_create_for_appointment()
            .withf(move |_, id| *id == appointment_id)
            .times(1)
            .returning(|caller, id| Ok(invoice(id, caller.user_id, Some(10))));
        let app = test::init_service(test_app(state_with(invoicing)).configure(routes)).await;
        let login = test::call_service(&app, login_request(barber).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/invoices")
                .cookie(session_cookie(&login))
                .set_json(json!({"appointmentId": appointment_id.to_string()}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["subtotalCents"], 3000);
        assert_eq!(body["discountCents"], 300);
        assert_eq!(body["totalCents"], 2700);
        assert_eq!(body["status"], "ISSUED");
    }

    #[actix_web::test]
    async fn issuing_requires_an_appointment_id() {
        let app = test::init_service(test_app(mock_state()).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/invoices")
                .cookie(session_cookie(&login))
                .set_json(json!({}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "appointmentId");
    }

    #[actix_web::test]
    async fn paying_twice_is_a_conflict() {
        let mut invoicing = MockInvoicing::new();
        invoicing
            .expect_mark_paid()
            .times(1)
            .returning(|_, _| Err(Error::conflict("invoice already paid")));
        let app = test::init_service(test_app(state_with(invoicing)).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/invoices/{}/pay", Uuid::new_v4()))
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn listing_is_private() {
        let mut invoicing = MockInvoicing::new();
        invoicing.expect_list_mine().times(1).returning(|_| Ok(Vec::new()));
        let app = test::init_service(test_app(state_with(invoicing)).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Client)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/invoices")
                .cookie(session_cookie(&login))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(actix_web::http::header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.starts_with("private"))
        );
    }
}
