//! Build the shared HTTP state from the configured repositories.
//!
//! With a database pool every driven port is served by its Diesel adapter;
//! without one the fixture repositories answer reads with empty results and
//! refuse writes as unavailable. Either way the same domain services sit on
//! top, so handlers never know which mode is active.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use barberbook::domain::ports::{
    AppointmentRepository, FixtureAppointmentRepository, FixtureGalleryRepository,
    FixtureInvoiceRepository, FixtureMessageRepository, FixturePromotionRepository,
    FixtureProviderRepository, FixturePushSubscriptionRepository, FixtureReportRepository,
    FixtureReviewRepository, FixtureSocialRepository, FixtureUserRepository, GalleryRepository,
    InvoiceRepository, MessageRepository, Notifications, PromotionRepository, ProviderRepository,
    PushSubscriptionRepository, ReportRepository, ReviewRepository, SocialRepository,
    UserRepository,
};
use barberbook::domain::{
    AccountService, BookingService, GalleryService, InvoiceService, MaintenanceService,
    MessagingService, NotificationService, PromotionService, ProviderService, ReportService,
    ReviewService, SocialService,
};
use barberbook::inbound::http::state::HttpState;
use barberbook::outbound::password::BcryptPasswordHasher;
use barberbook::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselGalleryRepository, DieselInvoiceRepository,
    DieselMessageRepository, DieselPromotionRepository, DieselProviderRepository,
    DieselPushSubscriptionRepository, DieselReportRepository, DieselReviewRepository,
    DieselSocialRepository, DieselUserRepository,
};

use super::ServerConfig;

/// One implementation of every driven repository port.
trait Repositories {
    type Users: UserRepository + 'static;
    type Providers: ProviderRepository + 'static;
    type Appointments: AppointmentRepository + 'static;
    type Promotions: PromotionRepository + 'static;
    type Social: SocialRepository + 'static;
    type Messages: MessageRepository + 'static;
    type Invoices: InvoiceRepository + 'static;
    type Reviews: ReviewRepository + 'static;
    type Subscriptions: PushSubscriptionRepository + 'static;
    type Gallery: GalleryRepository + 'static;
    type Reports: ReportRepository + 'static;

    fn users(&self) -> Arc<Self::Users>;
    fn providers(&self) -> Arc<Self::Providers>;
    fn appointments(&self) -> Arc<Self::Appointments>;
    fn promotions(&self) -> Arc<Self::Promotions>;
    fn social(&self) -> Arc<Self::Social>;
    fn messages(&self) -> Arc<Self::Messages>;
    fn invoices(&self) -> Arc<Self::Invoices>;
    fn reviews(&self) -> Arc<Self::Reviews>;
    fn subscriptions(&self) -> Arc<Self::Subscriptions>;
    fn gallery(&self) -> Arc<Self::Gallery>;
    fn reports(&self) -> Arc<Self::Reports>;
}

struct DieselRepositories {
    pool: DbPool,
}

impl Repositories for DieselRepositories {
    type Users = DieselUserRepository;
    type Providers = DieselProviderRepository;
    type Appointments = DieselAppointmentRepository;
    type Promotions = DieselPromotionRepository;
    type Social = DieselSocialRepository;
    type Messages = DieselMessageRepository;
    type Invoices = DieselInvoiceRepository;
    type Reviews = DieselReviewRepository;
    type Subscriptions = DieselPushSubscriptionRepository;
    type Gallery = DieselGalleryRepository;
    type Reports = DieselReportRepository;

    fn users(&self) -> Arc<Self::Users> {
        Arc::new(DieselUserRepository::new(self.pool.clone()))
    }

    fn providers(&self) -> Arc<Self::Providers> {
        Arc::new(DieselProviderRepository::new(self.pool.clone()))
    }

    fn appointments(&self) -> Arc<Self::Appointments> {
        Arc::new(DieselAppointmentRepository::new(self.pool.clone()))
    }

    fn promotions(&self) -> Arc<Self::Promotions> {
        Arc::new(DieselPromotionRepository::new(self.pool.clone()))
    }

    fn social(&self) -> Arc<Self::Social> {
        Arc::new(DieselSocialRepository::new(self.pool.clone()))
    }

    fn messages(&self) -> Arc<Self::Messages> {
        Arc::new(DieselMessageRepository::new(self.pool.clone()))
    }

    fn invoices(&self) -> Arc<Self::Invoices> {
        Arc::new(DieselInvoiceRepository::new(self.pool.clone()))
    }

    fn reviews(&self) -> Arc<Self::Reviews> {
        Arc::new(DieselReviewRepository::new(self.pool.clone()))
    }

    fn subscriptions(&self) -> Arc<Self::Subscriptions> {
        Arc::new(DieselPushSubscriptionRepository::new(self.pool.clone()))
    }

    fn gallery(&self) -> Arc<Self::Gallery> {
        Arc::new(DieselGalleryRepository::new(self.pool.clone()))
    }

    fn reports(&self) -> Arc<Self::Reports> {
        Arc::new(DieselReportRepository::new(self.pool.clone()))
    }
}

struct FixtureRepositories;

impl Repositories for FixtureRepositories {
    type Users = FixtureUserRepository;
    type Providers = FixtureProviderRepository;
    type Appointments = FixtureAppointmentRepository;
    type Promotions = FixturePromotionRepository;
    type Social = FixtureSocialRepository;
    type Messages = FixtureMessageRepository;
    type Invoices = FixtureInvoiceRepository;
    type Reviews = FixtureReviewRepository;
    type Subscriptions = FixturePushSubscriptionRepository;
    type Gallery = FixtureGalleryRepository;
    type Reports = FixtureReportRepository;

    fn users(&self) -> Arc<Self::Users> {
        Arc::new(FixtureUserRepository)
    }

    fn providers(&self) -> Arc<Self::Providers> {
        Arc::new(FixtureProviderRepository)
    }

    fn appointments(&self) -> Arc<Self::Appointments> {
        Arc::new(FixtureAppointmentRepository)
    }

    fn promotions(&self) -> Arc<Self::Promotions> {
        Arc::new(FixturePromotionRepository)
    }

    fn social(&self) -> Arc<Self::Social> {
        Arc::new(FixtureSocialRepository)
    }

    fn messages(&self) -> Arc<Self::Messages> {
        Arc::new(FixtureMessageRepository)
    }

    fn invoices(&self) -> Arc<Self::Invoices> {
        Arc::new(FixtureInvoiceRepository)
    }

    fn reviews(&self) -> Arc<Self::Reviews> {
        Arc::new(FixtureReviewRepository)
    }

    fn subscriptions(&self) -> Arc<Self::Subscriptions> {
        Arc::new(FixturePushSubscriptionRepository)
    }

    fn gallery(&self) -> Arc<Self::Gallery> {
        Arc::new(FixtureGalleryRepository)
    }

    fn reports(&self) -> Arc<Self::Reports> {
        Arc::new(FixtureReportRepository)
    }
}

/// Wire every domain service on top of `repos`.
///
/// Repositories shared by several services (appointments, promotions, users)
/// are built once and cloned so each service sees the same adapter.
fn compose<R: Repositories>(repos: &R, config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let adapters = &config.adapters;

    let users = repos.users();
    let providers = repos.providers();
    let appointments = repos.appointments();
    let promotions = repos.promotions();
    let social = repos.social();

    let notifications: Arc<dyn Notifications> = Arc::new(NotificationService::new(
        repos.subscriptions(),
        Arc::new(adapters.push.clone()),
    ));

    HttpState {
        accounts: Arc::new(AccountService::new(
            users.clone(),
            Arc::new(BcryptPasswordHasher::new(adapters.password_cost)),
        )),
        providers: Arc::new(ProviderService::new(
            providers.clone(),
            appointments.clone(),
            clock.clone(),
        )),
        bookings: Arc::new(BookingService::new(
            providers,
            appointments.clone(),
            notifications.clone(),
            clock.clone(),
        )),
        promotions: Arc::new(PromotionService::new(promotions.clone(), clock.clone())),
        social: Arc::new(SocialService::new(social.clone())),
        messaging: Arc::new(MessagingService::new(
            repos.messages(),
            users,
            notifications.clone(),
            clock.clone(),
        )),
        invoicing: Arc::new(InvoiceService::new(
            repos.invoices(),
            appointments.clone(),
            promotions.clone(),
            clock.clone(),
        )),
        reviews: Arc::new(ReviewService::new(
            repos.reviews(),
            appointments.clone(),
            clock.clone(),
        )),
        notifications,
        gallery: Arc::new(GalleryService::new(
            repos.gallery(),
            Arc::new(adapters.media.clone()),
            clock.clone(),
        )),
        reports: Arc::new(ReportService::new(repos.reports())),
        maintenance: Arc::new(MaintenanceService::new(
            appointments,
            social,
            promotions,
            config.retention,
            clock,
        )),
    }
}

/// Build the shared HTTP state, choosing Diesel or fixture repositories by
/// whether `config` carries a pool.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => compose(
            &DieselRepositories { pool: pool.clone() },
            config,
        ),
        None => compose(&FixtureRepositories, config),
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use actix_web::cookie::{Key, SameSite};
    use barberbook::domain::{ErrorCode, Principal, ProviderProfile, Role, UserId};
    use barberbook::outbound::media::LocalMediaStore;
    use barberbook::outbound::push::WebhookPushSender;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use crate::server::ServerAdapters;

    #[fixture]
    fn media_root() -> TempDir {
        TempDir::new().expect("temp dir")
    }

    fn fixture_config(media_root: &TempDir) -> ServerConfig {
        let adapters = ServerAdapters {
            media: LocalMediaStore::open(media_root.path(), "/media").expect("media store"),
            push: WebhookPushSender::new(Duration::from_secs(1)).expect("push client"),
            password_cost: 4,
        };
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("socket address"),
            adapters,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_mode_serves_empty_reads(media_root: TempDir) {
        let state = build_http_state(&fixture_config(&media_root));

        let providers = state
            .providers
            .list_providers()
            .await
            .expect("fixture list succeeds");

        assert!(providers.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_mode_reports_writes_as_unavailable(media_root: TempDir) {
        let state = build_http_state(&fixture_config(&media_root));
        let barber = Principal::new(UserId::random(), Role::Barber);

        let error = state
            .providers
            .upsert_profile(&barber, ProviderProfile::default())
            .await
            .expect_err("fixture writes fail");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
