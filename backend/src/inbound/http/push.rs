//! Web push subscription handlers.
//!
//! ```text
//! POST   /api/v1/push/subscriptions
//! DELETE /api/v1/push/subscriptions
//! POST   /api/v1/push/test
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, SubscriptionDraft, SubscriptionValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DispatchReportSchema, ErrorSchema, PushSubscriptionSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_user_id, require};

const ENDPOINT: FieldName = FieldName::new("endpoint");

/// Browser `PushSubscription.keys`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SubscriptionKeys {
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

/// Subscription as produced by `PushSubscription.toJSON()`. Keys may also
/// be sent at the top level.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SubscribeRequest {
    #[schema(example = "https://push.example.com/send/abc")]
    pub endpoint: Option<String>,
    pub keys: Option<SubscriptionKeys>,
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UnsubscribeRequest {
    pub endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestPushRequest {
    pub user_id: Option<String>,
}

fn parse_subscription(payload: SubscribeRequest) -> Result<SubscriptionDraft, Error> {
    let SubscribeRequest {
        endpoint,
        keys,
        p256dh,
        auth,
    } = payload;
    let keys = keys.unwrap_or_default();
    let endpoint = require(endpoint, ENDPOINT)?;
    let p256dh = require(keys.p256dh.or(p256dh), FieldName::new("p256dh"))?;
    let auth = require(keys.auth.or(auth), FieldName::new("auth"))?;
    SubscriptionDraft::try_new(&endpoint, &p256dh, &auth).map_err(|err| {
        let field = match &err {
            SubscriptionValidationError::InvalidEndpoint => ENDPOINT,
            SubscriptionValidationError::MissingKey { field } => FieldName::new(*field),
        };
        invalid_field_error(field, err)
    })
}

/// Register the caller's browser for push notifications.
///
/// Re-subscribing an existing endpoint replaces its keys.
#[utoipa::path(
    post,
    path = "/api/v1/push/subscriptions",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscription stored", body = PushSubscriptionSchema),
        (status = 400, description = "Invalid subscription", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["push"],
    operation_id = "subscribePush"
)]
#[post("/push/subscriptions")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubscribeRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let draft = parse_subscription(payload.into_inner())?;
    let subscription = state.notifications.subscribe(&caller, draft).await?;
    Ok(HttpResponse::Created().json(subscription))
}

/// Remove one of the caller's subscriptions. Unknown endpoints succeed.
#[utoipa::path(
    delete,
    path = "/api/v1/push/subscriptions",
    request_body = UnsubscribeRequest,
    responses(
        (status = 204, description = "Subscription removed"),
        (status = 400, description = "Missing endpoint", body = ErrorSchema)
    ),
    tags = ["push"],
    operation_id = "unsubscribePush"
)]
#[delete("/push/subscriptions")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UnsubscribeRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let endpoint = require(payload.into_inner().endpoint, ENDPOINT)?;
    state.notifications.unsubscribe(&caller, endpoint).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Send a test notification to a user. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/push/test",
    request_body = TestPushRequest,
    responses(
        (status = 200, description = "Dispatch tally", body = DispatchReportSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema)
    ),
    tags = ["push"],
    operation_id = "sendTestPush"
)]
#[post("/push/test")]
pub async fn send_test(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TestPushRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let field = FieldName::new("userId");
    let user_id = parse_user_id(&require(payload.into_inner().user_id, field)?, field)?;
    let report = state.notifications.send_test(&caller, user_id).await?;
    Ok(HttpResponse::Ok().json(report))
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
    use crate::domain::ports::MockNotifications;
    use crate::domain::test_support::{fixture_now, principal};
    use crate::domain::{DispatchReport, PushSubscription, Role, UserId};
    use crate::inbound::http::test_utils::{login_request, mock_state, session_cookie, test_app};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/api/v1")
                .service(subscribe)
                .service(unsubscribe)
                .service(send_test),
        );
    }

    fn state_with(notifications: MockNotifications) -> HttpState {
        HttpState {
            notifications: Arc::new(notifications),
            ..mock_state()
        }
    }

    #[rstest]
    #[case(json!({"endpoint": "https://push.example.com/a", "keys": {"p256dh": "BNc", "auth": "tBH"}}))]
    #[case(json!({"endpoint": "https://push.example.com/a", "p256dh": "BNc", "auth": "tBH"}))]
    #[actix_web::test]
    async fn subscription_accepts_nested_or_flat_keys(#[case] payload: Value) {
        let mut notifications = MockNotifications::new();
        notifications
            .expect_subscribe()
            .withf(|_, draft| {
                draft.endpoint == "https://push.example.com/a" && draft.p256dh == "BNc" && draft.auth == "tBH"
            })
            .times(1)
            .returning(|caller, draft| {
                Ok(PushSubscription {
                    id: Uuid::new_v4(),
                    user_id: caller.user_id,
                    endpoint: draft.endpoint,
                    p256dh: draft.p256dh,
                    auth: draft.auth,
                    created_at: fixture_now(),
                })
            });
        let app = test::init_service(test_app(state_with(notifications)).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Client)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/push/subscriptions")
                .cookie(session_cookie(&login))
                .set_json(payload)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[rstest]
    #[case(json!({"endpoint": "http://push.example.com/a", "p256dh": "BNc", "auth": "tBH"}), "endpoint")]
    #[case(json!({"endpoint": "https://push.example.com/a", "p256dh": " ", "auth": "tBH"}), "p256dh")]
    #[case(json!({"endpoint": "https://push.example.com/a", "p256dh": "BNc"}), "auth")]
    #[actix_web::test]
    async fn invalid_subscriptions_name_the_field(#[case] payload: Value, #[case] field: &str) {
        let app = test::init_service(test_app(mock_state()).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Client)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/push/subscriptions")
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
    async fn unsubscribe_returns_no_content() {
        let mut notifications = MockNotifications::new();
        notifications
            .expect_unsubscribe()
            .withf(|_, endpoint| endpoint == "https://push.example.com/a")
            .times(1)
            .returning(|_, _| Ok(()));
        let app = test::init_service(test_app(state_with(notifications)).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Client)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/api/v1/push/subscriptions")
                .cookie(session_cookie(&login))
                .set_json(json!({"endpoint": "https://push.example.com/a"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn test_push_returns_the_tally() {
        let target = UserId::random();
        let mut notifications = MockNotifications::new();
        notifications
            .expect_send_test()
            .withf(move |_, user| *user == target)
            .times(1)
            .returning(|_, _| {
                Ok(DispatchReport {
                    delivered: 1,
                    removed: 1,
                    failed: 0,
                })
            });
        let app = test::init_service(test_app(state_with(notifications)).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Admin)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/push/test")
                .cookie(session_cookie(&login))
                .set_json(json!({"userId": target.to_string()}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body, json!({"delivered": 1, "removed": 1, "failed": 0}));
    }
}
