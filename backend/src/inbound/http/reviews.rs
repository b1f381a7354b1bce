//! Review handlers.
//!
//! ```text
//! POST /api/v1/reviews
//! PUT  /api/v1/reviews/{id}/response
//! GET  /api/v1/providers/{id}/reviews
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::Rating;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ReviewSchema, ReviewSummarySchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_user_id, parse_uuid, require,
};

/// Review of a completed appointment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub appointment_id: Option<String>,
    #[schema(example = 5)]
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Provider's reply, replacing the automatic one.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReviewResponseRequest {
    pub response: Option<String>,
}

/// Review a completed appointment. Client only, once per appointment.
///
/// The stored review carries an automatic response until the provider
/// writes their own.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewSchema),
        (status = 400, description = "Invalid rating or appointment not completed", body = ErrorSchema),
        (status = 403, description = "Not the appointment's client", body = ErrorSchema),
        (status = 409, description = "Already reviewed", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let ReviewRequest {
        appointment_id,
        rating,
        comment,
    } = payload.into_inner();
    let appointment_field = FieldName::new("appointmentId");
    let rating_field = FieldName::new("rating");
    let appointment_id = parse_uuid(&require(appointment_id, appointment_field)?, appointment_field)?;
    let rating = Rating::new(require(rating, rating_field)?)
        .map_err(|err| invalid_field_error(rating_field, err))?;
    let review = state
        .reviews
        .create(&caller, appointment_id, rating, comment)
        .await?;
    info!(review_id = %review.id, barber_id = %review.barber_id, rating = rating.get(), "review created");
    Ok(HttpResponse::Created().json(review))
}

/// Replace the response on a review of the caller.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/response",
    params(("id" = String, Path, description = "Review id")),
    request_body = ReviewResponseRequest,
    responses(
        (status = 200, description = "Updated review", body = ReviewSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the reviewed provider", body = ErrorSchema),
        (status = 404, description = "Unknown review", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "respondToReview"
)]
#[put("/reviews/{id}/response")]
pub async fn respond(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewResponseRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let response = require(payload.into_inner().response, FieldName::new("response"))?;
    let review = state.reviews.respond(&caller, id, response).await?;
    Ok(HttpResponse::Ok().json(review))
}

/// Reviews of a provider with the average rating.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}/reviews",
    params(("id" = String, Path, description = "Provider user id")),
    responses((status = 200, description = "Review summary", body = ReviewSummarySchema)),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/providers/{id}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let barber_id = parse_user_id(&path, FieldName::new("id"))?;
    let summary = state.reviews.list_for_barber(barber_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::MockReviews;
    use crate::domain::test_support::{fixture_now, principal};
    use crate::domain::{Review, ReviewSummary, Role, UserId, auto_response};
    use crate::inbound::http::test_utils::{login_request, mock_state, session_cookie, test_app};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/api/v1")
                .service(create_review)
                .service(respond)
                .service(list_reviews),
        );
    }

    fn state_with(reviews: MockReviews) -> HttpState {
        HttpState {
            reviews: Arc::new(reviews),
            ..mock_state()
        }
    }

    fn review(barber_id: UserId, rating: Rating) -> Review {
        Review {
            id: Uuid::new_v4(),
            appointment_id: Uuid::new_v4(),
            barber_id,
            client_id: UserId::random(),
            client_name: "Ada".into(),
            rating,
            comment: None,
            response: Some(auto_response(rating, "Ada")),
            responded_at: Some(fixture_now()),
            created_at: fixture_now(),
        }
    }

    #[rstest]
    #[case(json!({"appointmentId": "6c1c4d2e-0a4f-4a57-9a34-5b8f8f4f1b11", "rating": 0}), "rating")]
    #[case(json!({"appointmentId": "6c1c4d2e-0a4f-4a57-9a34-5b8f8f4f1b11", "rating": 6}), "rating")]
    #[case(json!({"appointmentId": "6c1c4d2e-0a4f-4a57-9a34-5b8f8f4f1b11"}), "rating")]
    #[case(json!({"rating": 4}), "appointmentId")]
    #[actix_web::test]
    async fn invalid_reviews_name_the_field(#[case] payload: Value, #[case] field: &str) {
        let app = test::init_service(test_app(mock_state()).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Client)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/reviews")
                .cookie(session_cookie(&login))
                .set_json(payload)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn review_is_created_with_the_parsed_rating() {
        let mut reviews = MockReviews::new();
        reviews
            .expect_create()
            .withf(|_, _, rating, comment| rating.get() == 4 && comment.as_deref() == Some("Great fade"))
            .times(1)
            .returning(|_, _, rating, _| Ok(review(UserId::random(), rating)));
        let app = test::init_service(test_app(state_with(reviews)).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Client)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/reviews")
                .cookie(session_cookie(&login))
                .set_json(json!({
                    "appointmentId": Uuid::new_v4().to_string(),
                    "rating": 4,
                    "comment": "Great fade",
                }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["rating"], 4);
        assert!(body["response"].is_string());
    }

    #[actix_web::test]
    async fn provider_reviews_are_public() {
        let barber_id = UserId::random();
        let mut reviews = MockReviews::new();
        reviews
            .expect_list_for_barber()
            .withf(move |id| *id == barber_id)
            .times(1)
            .returning(|id| {
                let five = Rating::new(5).expect("valid rating");
                let four = Rating::new(4).expect("valid rating");
                Ok(ReviewSummary::from_reviews(id, vec![review(id, five), review(id, four)]))
            });
        let app = test::init_service(test_app(state_with(reviews)).configure(routes)).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/providers/{barber_id}/reviews"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["averageRating"], 4.5);
        assert_eq!(body["reviewCount"], 2);
    }

    #[actix_web::test]
    async fn responding_requires_text() {
        let app = test::init_service(test_app(mock_state()).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/reviews/{}/response", Uuid::new_v4()))
                .cookie(session_cookie(&login))
                .set_json(json!({}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
