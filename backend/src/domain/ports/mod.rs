//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`Accounts`, `Bookings`, ...) are what inbound adapters
//! call. Driven ports (`*Repository`, `PasswordHasher`, `PushSender`,
//! `MediaStore`) are what services call. Each driven port exposes a typed
//! error enum generated by [`define_port_error!`] so adapters map their
//! failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod appointment_repository;
mod bookings;
mod gallery;
mod gallery_repository;
mod invoice_repository;
mod invoicing;
mod maintenance;
mod media_store;
mod message_repository;
mod messaging;
mod notifications;
mod password_hasher;
mod promotion_repository;
mod promotions;
mod provider_repository;
mod providers;
mod push_sender;
mod push_subscription_repository;
mod report_repository;
mod reports;
mod review_repository;
mod reviews;
mod social_feed;
mod social_repository;
mod user_repository;

#[cfg(test)]
pub use accounts::MockAccounts;
pub use accounts::Accounts;
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{
    AppointmentPersistenceError, AppointmentRepository, FixtureAppointmentRepository,
};
#[cfg(test)]
pub use bookings::MockBookings;
pub use bookings::{BookingRequest, Bookings, DateRange};
#[cfg(test)]
pub use gallery::MockGallery;
pub use gallery::Gallery;
#[cfg(test)]
pub use gallery_repository::MockGalleryRepository;
pub use gallery_repository::{FixtureGalleryRepository, GalleryPersistenceError, GalleryRepository};
#[cfg(test)]
pub use invoice_repository::MockInvoiceRepository;
pub use invoice_repository::{FixtureInvoiceRepository, InvoicePersistenceError, InvoiceRepository};
#[cfg(test)]
pub use invoicing::MockInvoicing;
pub use invoicing::Invoicing;
#[cfg(test)]
pub use maintenance::MockMaintenance;
pub use maintenance::Maintenance;
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaStore, MediaStoreError};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{FixtureMessageRepository, MessagePersistenceError, MessageRepository};
#[cfg(test)]
pub use messaging::MockMessaging;
pub use messaging::Messaging;
#[cfg(test)]
pub use notifications::MockNotifications;
pub use notifications::Notifications;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use promotion_repository::MockPromotionRepository;
pub use promotion_repository::{
    FixturePromotionRepository, PromotionPersistenceError, PromotionRepository,
};
#[cfg(test)]
pub use promotions::MockPromotions;
pub use promotions::Promotions;
#[cfg(test)]
pub use provider_repository::MockProviderRepository;
pub use provider_repository::{
    FixtureProviderRepository, ProviderPersistenceError, ProviderRepository,
};
#[cfg(test)]
pub use providers::MockProviders;
pub use providers::Providers;
#[cfg(test)]
pub use push_sender::MockPushSender;
pub use push_sender::{PushSendError, PushSender};
#[cfg(test)]
pub use push_subscription_repository::MockPushSubscriptionRepository;
pub use push_subscription_repository::{
    FixturePushSubscriptionRepository, PushSubscriptionPersistenceError,
    PushSubscriptionRepository,
};
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use report_repository::{FixtureReportRepository, ReportQueryError, ReportRepository};
#[cfg(test)]
pub use reports::MockReports;
pub use reports::Reports;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{FixtureReviewRepository, ReviewPersistenceError, ReviewRepository};
#[cfg(test)]
pub use reviews::MockReviews;
pub use reviews::Reviews;
#[cfg(test)]
pub use social_feed::MockSocialFeed;
pub use social_feed::SocialFeed;
#[cfg(test)]
pub use social_repository::MockSocialRepository;
pub use social_repository::{FixtureSocialRepository, SocialPersistenceError, SocialRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
