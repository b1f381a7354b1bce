//! Mapping from driven-port errors to the domain [`Error`] envelope.
//!
//! Connection failures become `service_unavailable`, query failures
//! `internal_error`, and uniqueness or in-use violations `conflict`.

use crate::domain::Error;
use crate::domain::ports::{
    AppointmentPersistenceError, GalleryPersistenceError, InvoicePersistenceError,
    MediaStoreError, MessagePersistenceError, PasswordHashError, PromotionPersistenceError,
    ProviderPersistenceError, PushSubscriptionPersistenceError, ReportQueryError,
    ReviewPersistenceError, SocialPersistenceError, UserPersistenceError,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { .. } => Error::conflict("email is already registered"),
    }
}

pub(crate) fn map_provider_error(error: ProviderPersistenceError) -> Error {
    match error {
        ProviderPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("provider repository unavailable: {message}"))
        }
        ProviderPersistenceError::Query { message } => {
            Error::internal(format!("provider repository error: {message}"))
        }
        ProviderPersistenceError::InUse { message } => Error::conflict(message),
    }
}

pub(crate) fn map_appointment_error(error: AppointmentPersistenceError) -> Error {
    match error {
        AppointmentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentPersistenceError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
        AppointmentPersistenceError::Overlap => {
            Error::conflict("the barber already has an appointment at that time")
        }
    }
}

pub(crate) fn map_promotion_error(error: PromotionPersistenceError) -> Error {
    match error {
        PromotionPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("promotion repository unavailable: {message}"))
        }
        PromotionPersistenceError::Query { message } => {
            Error::internal(format!("promotion repository error: {message}"))
        }
    }
}

pub(crate) fn map_social_error(error: SocialPersistenceError) -> Error {
    match error {
        SocialPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("social repository unavailable: {message}"))
        }
        SocialPersistenceError::Query { message } => {
            Error::internal(format!("social repository error: {message}"))
        }
    }
}

pub(crate) fn map_message_error(error: MessagePersistenceError) -> Error {
    match error {
        MessagePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("message repository unavailable: {message}"))
        }
        MessagePersistenceError::Query { message } => {
            Error::internal(format!("message repository error: {message}"))
        }
    }
}

pub(crate) fn map_invoice_error(error: InvoicePersistenceError) -> Error {
    match error {
        InvoicePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("invoice repository unavailable: {message}"))
        }
        InvoicePersistenceError::Query { message } => {
            Error::internal(format!("invoice repository error: {message}"))
        }
        InvoicePersistenceError::Duplicate { .. } => {
            Error::conflict("an invoice already exists for this appointment")
        }
    }
}

pub(crate) fn map_review_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewPersistenceError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewPersistenceError::Duplicate { .. } => {
            Error::conflict("this appointment has already been reviewed")
        }
    }
}

pub(crate) fn map_subscription_error(error: PushSubscriptionPersistenceError) -> Error {
    match error {
        PushSubscriptionPersistenceError::Connection { message } => Error::service_unavailable(
            format!("push subscription repository unavailable: {message}"),
        ),
        PushSubscriptionPersistenceError::Query { message } => {
            Error::internal(format!("push subscription repository error: {message}"))
        }
    }
}

pub(crate) fn map_gallery_error(error: GalleryPersistenceError) -> Error {
    match error {
        GalleryPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("gallery repository unavailable: {message}"))
        }
        GalleryPersistenceError::Query { message } => {
            Error::internal(format!("gallery repository error: {message}"))
        }
    }
}

pub(crate) fn map_report_error(error: ReportQueryError) -> Error {
    match error {
        ReportQueryError::Connection { message } => {
            Error::service_unavailable(format!("report repository unavailable: {message}"))
        }
        ReportQueryError::Query { message } => {
            Error::internal(format!("report repository error: {message}"))
        }
    }
}

pub(crate) fn map_media_error(error: MediaStoreError) -> Error {
    match error {
        MediaStoreError::InvalidKey { key } => Error::internal(format!("invalid media key: {key}")),
        MediaStoreError::Io { message } => {
            Error::service_unavailable(format!("media store unavailable: {message}"))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}
