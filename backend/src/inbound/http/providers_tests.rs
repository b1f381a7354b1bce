//! Handler tests for provider endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use chrono::{Duration, NaiveDate};
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::ports::MockProviders;
use crate::domain::test_support::{fixture_now, principal, service};
use crate::domain::{ClickSummary, Role, Slot, TimeOfDay, UserId};
use crate::inbound::http::test_utils::{login_request, mock_state, session_cookie, test_app};

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(list_providers)
            .service(upsert_profile)
            .service(create_service)
            .service(update_service)
            .service(delete_service)
            .service(set_availability)
            .service(open_slots)
            .service(record_click)
            .service(click_summary)
            .service(get_provider),
    );
}

fn state_with(providers: MockProviders) -> HttpState {
    HttpState {
        providers: Arc::new(providers),
        ..mock_state()
    }
}

#[actix_web::test]
async fn availability_accepts_day_names_and_twelve_hour_times() {
    let barber = principal(Role::Barber);
    let mut providers = MockProviders::new();
    providers
        .expect_set_availability()
        .withf(|_, windows| {
            windows.len() == 2
                && windows[0].day_of_week() == DayOfWeek::Monday
                && windows[0].start() == TimeOfDay::from_hm(9, 0).expect("09:00")
                && windows[1].day_of_week() == DayOfWeek::Saturday
                && windows[1].end() == TimeOfDay::from_hm(13, 30).expect("13:30")
        })
        .times(1)
        .returning(|_, windows| Ok(windows));
    let app = test::init_service(test_app(state_with(providers)).configure(routes)).await;
    let login = test::call_service(&app, login_request(barber).to_request()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/providers/me/availability")
            .cookie(session_cookie(&login))
            .set_json(json!({"windows": [
                {"dayOfWeek": "monday", "start": "9am", "end": "17:30"},
                {"dayOfWeek": 6, "start": "10:00", "end": "1:30 pm"},
            ]}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body[0]["dayOfWeek"], "MONDAY");
    assert_eq!(body[0]["start"], "09:00");
    assert_eq!(body[1]["end"], "13:30");
}

#[rstest]
#[case(json!({"dayOfWeek": 7, "start": "9:00", "end": "17:00"}))]
#[case(json!({"dayOfWeek": "funday", "start": "9:00", "end": "17:00"}))]
#[case(json!({"dayOfWeek": 1, "start": "25:00", "end": "17:00"}))]
#[case(json!({"dayOfWeek": 1, "start": "17:00", "end": "9:00"}))]
#[actix_web::test]
async fn invalid_windows_are_rejected_with_their_index(#[case] window: Value) {
    let app = test::init_service(test_app(mock_state()).configure(routes)).await;
    let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/providers/me/availability")
            .cookie(session_cookie(&login))
            .set_json(json!({"windows": [
                {"dayOfWeek": 0, "start": "10:00", "end": "14:00"},
                window,
            ]}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["index"], 1);
    assert_eq!(body["details"]["code"], "invalid_window");
}

#[actix_web::test]
async fn slots_parse_the_query_and_are_public() {
    let barber_id = UserId::random();
    let service_id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2026, 3, 3).expect("valid date");
    let slot_start = fixture_now() + Duration::days(1) + Duration::hours(1);
    let mut providers = MockProviders::new();
    providers
        .expect_open_slots()
        .withf(move |barber, service, day| *barber == barber_id && *service == service_id && *day == date)
        .times(1)
        .returning(move |_, _, _| {
            Ok(vec![Slot {
                starts_at: slot_start,
                ends_at: slot_start + Duration::minutes(30),
            }])
        });
    let app = test::init_service(test_app(state_with(providers)).configure(routes)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/providers/{barber_id}/slots?serviceId={service_id}&date=2026-03-03"
            ))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body[0]["startsAt"], "2026-03-03T09:00:00Z");
}

#[actix_web::test]
async fn slots_require_a_service() {
    let app = test::init_service(test_app(mock_state()).configure(routes)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/providers/{}/slots?date=2026-03-03", UserId::random()))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "serviceId");
}

#[actix_web::test]
async fn create_service_returns_created() {
    let barber = principal(Role::Stylist);
    let mut providers = MockProviders::new();
    providers
        .expect_create_service()
        .withf(|_, draft| draft.name() == "Beard trim" && draft.duration_minutes() == 20)
        .times(1)
        .returning(|caller, draft| {
            let mut offering = service(caller.user_id, draft.duration_minutes(), draft.price_cents());
            offering.name = draft.name().to_owned();
            Ok(offering)
        });
    let app = test::init_service(test_app(state_with(providers)).configure(routes)).await;
    let login = test::call_service(&app, login_request(barber).to_request()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/providers/me/services")
            .cookie(session_cookie(&login))
            .set_json(json!({"name": " Beard trim ", "priceCents": 1500, "durationMinutes": 20}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["priceCents"], 1500);
}

#[rstest]
#[case(json!({"priceCents": 1500, "durationMinutes": 20}), "name")]
#[case(json!({"name": "Cut", "priceCents": -1, "durationMinutes": 20}), "priceCents")]
#[case(json!({"name": "Cut", "priceCents": 100, "durationMinutes": 2}), "durationMinutes")]
#[actix_web::test]
async fn create_service_validates_fields(#[case] payload: Value, #[case] field: &str) {
    let app = test::init_service(test_app(mock_state()).configure(routes)).await;
    let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/providers/me/services")
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
async fn delete_conflict_passes_through() {
    let mut providers = MockProviders::new();
    providers
        .expect_delete_service()
        .times(1)
        .returning(|_, _| Err(Error::conflict("service has appointments")));
    let app = test::init_service(test_app(state_with(providers)).configure(routes)).await;
    let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/services/{}", Uuid::new_v4()))
            .cookie(session_cookie(&login))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn profile_links_are_normalised_before_storing() {
    let mut providers = MockProviders::new();
    providers
        .expect_upsert_profile()
        .withf(|_, profile| {
            profile.instagram_url.as_deref() == Some("https://instagram.com/jo")
                && profile.website_url.is_none()
        })
        .times(1)
        .returning(|_, profile| Ok(profile));
    let app = test::init_service(test_app(state_with(providers)).configure(routes)).await;
    let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/providers/me/profile")
            .cookie(session_cookie(&login))
            .set_json(json!({"bio": "Fades", "instagramUrl": "instagram.com/jo", "websiteUrl": ""}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn unknown_click_platform_is_rejected() {
    let app = test::init_service(test_app(mock_state()).configure(routes)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/providers/{}/clicks", UserId::random()))
            .set_json(json!({"platform": "myspace"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "platform");
}

#[actix_web::test]
async fn click_summary_forwards_since() {
    let barber = principal(Role::Barber);
    let since = fixture_now();
    let mut providers = MockProviders::new();
    providers
        .expect_click_summary()
        .withf(move |caller, id, from| *id == caller.user_id && *from == Some(since))
        .times(1)
        .returning(|_, _, _| Ok(ClickSummary::from_counts(&[(SocialPlatform::Tiktok, 3)])));
    let app = test::init_service(test_app(state_with(providers)).configure(routes)).await;
    let login = test::call_service(&app, login_request(barber).to_request()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/v1/providers/{}/clicks?since=2026-03-02T08:00:00Z",
                barber.user_id
            ))
            .cookie(session_cookie(&login))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["total"], 3);
}
