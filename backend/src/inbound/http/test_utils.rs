//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::Principal;
use crate::domain::ports::{
    MockAccounts, MockBookings, MockGallery, MockInvoicing, MockMaintenance, MockMessaging,
    MockNotifications, MockPromotions, MockProviders, MockReports, MockReviews, MockSocialFeed,
};
use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::session::{ROLE_KEY, USER_ID_KEY};
use crate::inbound::http::state::HttpState;

/// Route that writes an arbitrary principal into the session.
pub const TEST_LOGIN_PATH: &str = "/__test/login";

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation, names the cookie `session` and
/// disables the `Secure` flag for plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// State whose ports are strict mocks with no expectations.
///
/// Any call to a port the test did not configure panics, so each handler
/// test only needs to set up the port it exercises.
pub fn mock_state() -> HttpState {
    HttpState {
        accounts: Arc::new(MockAccounts::new()),
        providers: Arc::new(MockProviders::new()),
        bookings: Arc::new(MockBookings::new()),
        promotions: Arc::new(MockPromotions::new()),
        social: Arc::new(MockSocialFeed::new()),
        messaging: Arc::new(MockMessaging::new()),
        invoicing: Arc::new(MockInvoicing::new()),
        reviews: Arc::new(MockReviews::new()),
        notifications: Arc::new(MockNotifications::new()),
        gallery: Arc::new(MockGallery::new()),
        reports: Arc::new(MockReports::new()),
        maintenance: Arc::new(MockMaintenance::new()),
    }
}

async fn test_login(session: Session, principal: web::Json<Principal>) -> HttpResponse {
    let Principal { user_id, role } = principal.into_inner();
    session
        .insert(USER_ID_KEY, user_id.to_string())
        .expect("store user id");
    session
        .insert(ROLE_KEY, role.as_str())
        .expect("store role");
    HttpResponse::NoContent().finish()
}

/// App with state, extractor error handlers, sessions and a login shortcut.
///
/// Mount the handlers under test with `.service(web::scope("/api/v1")...)`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .route(TEST_LOGIN_PATH, web::post().to(test_login))
        .wrap(test_session_middleware())
}

/// Request that logs `principal` in through [`TEST_LOGIN_PATH`].
pub fn login_request(principal: Principal) -> test::TestRequest {
    test::TestRequest::post()
        .uri(TEST_LOGIN_PATH)
        .set_json(principal)
}

/// Extract the `session` cookie set on a response.
pub fn session_cookie<B: MessageBody>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
