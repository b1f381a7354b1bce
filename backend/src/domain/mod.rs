//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the rules they enforce, and the services implementing each
//! driving port. Nothing here depends on Actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Principal: the authenticated caller and its role checks.
//! - Entities: User, Provider, ServiceOffering, AvailabilityWindow,
//!   Appointment, Promotion, Post, Comment, Message, Invoice, Review,
//!   PushSubscription, GalleryImage.
//! - Services: one per driving port in [`ports`].

pub mod access;
pub mod appointment;
pub mod auth;
pub mod barber;
pub mod click;
pub mod error;
pub mod export;
pub mod formatting;
pub mod gallery;
pub mod invoice;
pub mod maintenance;
pub mod message;
pub mod notification;
pub mod ports;
pub mod promotion;
pub mod reporting;
pub mod review;
pub mod schedule;
pub mod social;
pub mod trace_id;
pub mod user;

mod account_service;
mod booking_service;
mod gallery_service;
mod invoice_service;
mod maintenance_service;
mod messaging_service;
mod notification_service;
mod promotion_service;
mod provider_service;
mod report_service;
mod repository_errors;
#[cfg(test)]
pub(crate) mod test_support;
mod review_service;
mod social_service;

pub use self::access::Principal;
pub use self::account_service::AccountService;
pub use self::appointment::{
    Appointment, AppointmentDetails, AppointmentError, AppointmentFilter, AppointmentStatus,
    NewAppointment,
};
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MAX_BYTES, PASSWORD_MIN_LEN, Registration,
};
pub use self::barber::{
    Provider, ProviderDetail, ProviderProfile, ProviderValidationError, ServiceDraft,
    ServiceOffering, ServicePatch,
};
pub use self::booking_service::BookingService;
pub use self::click::{ClickSummary, PlatformClicks, SocialPlatform, UnknownPlatform};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gallery::{GalleryImage, ImageKind, ImageUpload, UploadValidationError};
pub use self::gallery_service::GalleryService;
pub use self::invoice::{Invoice, InvoiceError, InvoiceStatus, InvoiceTotals, LineItem, NewInvoice};
pub use self::invoice_service::InvoiceService;
pub use self::maintenance::{RetentionPolicy, SweepReport};
pub use self::maintenance_service::MaintenanceService;
pub use self::message::{Message, NewMessage, UnreadCount};
pub use self::messaging_service::MessagingService;
pub use self::notification::{
    DispatchReport, Notification, PushOutcome, PushSubscription, SubscriptionDraft,
    SubscriptionValidationError,
};
pub use self::notification_service::NotificationService;
pub use self::promotion::{Promotion, PromotionDraft, PromotionValidationError};
pub use self::promotion_service::PromotionService;
pub use self::provider_service::ProviderService;
pub use self::report_service::ReportService;
pub use self::reporting::{
    ProviderRanking, Revenue, RoleCount, StatusCount, SummaryReport, TOP_PROVIDERS,
};
pub use self::review::{
    NewReview, Rating, Review, ReviewSummary, ReviewValidationError, auto_response,
};
pub use self::review_service::ReviewService;
pub use self::schedule::{
    AvailabilityWindow, DayOfWeek, ScheduleValidationError, Slot, TimeOfDay,
};
pub use self::social::{
    Comment, Content, ContentValidationError, LikeOutcome, Post, TimelineKey,
};
pub use self::social_service::SocialService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, Email, NewUser, ProfileUpdate, Role, User, UserCredentials, UserId,
    UserValidationError,
};
