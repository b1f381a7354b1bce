//! PostgreSQL persistence adapters using Diesel with `diesel-async` and a
//! `bb8` pool.
//!
//! Repositories only translate between row structs and domain types. Row
//! structs (`models.rs`) and the table definitions (`schema.rs`) stay private
//! to this module; every failure surfaces as the port's error enum.
//!
//! ```ignore
//! use barberbook::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/barberbook")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_appointment_repository;
mod diesel_gallery_repository;
mod diesel_invoice_repository;
mod diesel_message_repository;
mod diesel_promotion_repository;
mod diesel_provider_repository;
mod diesel_push_subscription_repository;
mod diesel_report_repository;
mod diesel_review_repository;
mod diesel_social_repository;
mod diesel_user_repository;
pub(crate) mod error_mapping;
mod migrations;
pub(crate) mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_gallery_repository::DieselGalleryRepository;
pub use diesel_invoice_repository::DieselInvoiceRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_promotion_repository::DieselPromotionRepository;
pub use diesel_provider_repository::DieselProviderRepository;
pub use diesel_push_subscription_repository::DieselPushSubscriptionRepository;
pub use diesel_report_repository::DieselReportRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_social_repository::DieselSocialRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
