//! Shared harness for HTTP integration tests.
//!
//! Accounts, providers, appointments and the social feed run over
//! [`MemoryStore`]; every other port uses the fixture repositories the
//! server falls back to without a database.

pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use actix_session::{SessionMiddleware, config::CookieContentSecurity, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use barberbook::Trace;
use barberbook::domain::ports::{
    FixtureGalleryRepository, FixtureInvoiceRepository, FixtureMessageRepository,
    FixturePromotionRepository, FixturePushSubscriptionRepository, FixtureReportRepository,
    FixtureReviewRepository, Notifications,
};
use barberbook::domain::{
    AccountService, BookingService, GalleryService, InvoiceService, MaintenanceService,
    MessagingService, NotificationService, PromotionService, ProviderService, ReportService,
    RetentionPolicy, ReviewService, SocialService,
};
use barberbook::inbound::http::configure_api;
use barberbook::inbound::http::error::{
    json_error_handler, path_error_handler, query_error_handler,
};
use barberbook::inbound::http::state::HttpState;
use barberbook::outbound::media::LocalMediaStore;
use barberbook::outbound::password::BcryptPasswordHasher;
use barberbook::outbound::push::WebhookPushSender;
use mockable::{Clock, DefaultClock};
use tempfile::TempDir;

pub use memory::MemoryStore;

/// Lowest bcrypt cost, to keep tests fast.
pub const TEST_PASSWORD_COST: u32 = 4;

/// Compose the full service graph over `store`.
pub fn http_state(store: &MemoryStore, media_root: &TempDir) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = Arc::new(store.clone());
    let promotions = Arc::new(FixturePromotionRepository);
    let notifications: Arc<dyn Notifications> = Arc::new(NotificationService::new(
        Arc::new(FixturePushSubscriptionRepository),
        Arc::new(WebhookPushSender::new(Duration::from_secs(1)).expect("push client")),
    ));
    let media = LocalMediaStore::open(media_root.path(), "/media").expect("media store");

    HttpState {
        accounts: Arc::new(AccountService::new(
            store.clone(),
            Arc::new(BcryptPasswordHasher::new(TEST_PASSWORD_COST)),
        )),
        providers: Arc::new(ProviderService::new(store.clone(), store.clone(), clock.clone())),
        bookings: Arc::new(BookingService::new(
            store.clone(),
            store.clone(),
            notifications.clone(),
            clock.clone(),
        )),
        promotions: Arc::new(PromotionService::new(promotions.clone(), clock.clone())),
        social: Arc::new(SocialService::new(store.clone())),
        messaging: Arc::new(MessagingService::new(
            Arc::new(FixtureMessageRepository),
            store.clone(),
            notifications.clone(),
            clock.clone(),
        )),
        invoicing: Arc::new(InvoiceService::new(
            Arc::new(FixtureInvoiceRepository),
            store.clone(),
            promotions.clone(),
            clock.clone(),
        )),
        reviews: Arc::new(ReviewService::new(
            Arc::new(FixtureReviewRepository),
            store.clone(),
            clock.clone(),
        )),
        notifications,
        gallery: Arc::new(GalleryService::new(
            Arc::new(FixtureGalleryRepository),
            Arc::new(media),
            clock.clone(),
        )),
        reports: Arc::new(ReportService::new(Arc::new(FixtureReportRepository))),
        maintenance: Arc::new(MaintenanceService::new(
            store.clone(),
            store,
            promotions,
            RetentionPolicy::default(),
            clock,
        )),
    }
}

/// The `/api/v1` application as the server mounts it.
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
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_same_site(SameSite::Lax)
        .cookie_content_security(CookieContentSecurity::Private)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(web::scope("/api/v1").wrap(session).configure(configure_api))
}

/// Extract the session cookie from a login or registration response.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
