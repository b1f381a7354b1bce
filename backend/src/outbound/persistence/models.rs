//! Diesel row structs. Internal to the persistence layer; repositories
//! convert them into domain types before returning.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Appointment, AppointmentStatus, AvailabilityWindow, DayOfWeek, DisplayName, Email,
    GalleryImage, Invoice, InvoiceStatus, InvoiceTotals, LineItem, Message, Promotion,
    ProviderProfile, PushSubscription, Rating, Review, Role, ServiceOffering, SocialPlatform,
    TimeOfDay, User, UserId,
};

use super::schema::{
    appointments, availability_windows, comments, gallery_images, invoices, messages, posts,
    promotions, provider_profiles, push_subscriptions, reviews, services, social_clicks, users,
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}

/// `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub display_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = provider_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(primary_key(user_id))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProviderProfileRow {
    pub user_id: Uuid,
    pub bio: String,
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceRow {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = services)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ServiceChangeset<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price_cents: i64,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = availability_windows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvailabilityRow {
    pub barber_id: Uuid,
    pub day_of_week: i16,
    pub start_minute: i32,
    pub end_minute: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = social_clicks)]
pub(crate) struct NewClickRow<'a> {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub platform: &'a str,
    pub clicked_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Promotions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = promotions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PromotionRow {
    pub id: Uuid,
    pub barber_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: i16,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Social feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub like_count: i32,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvoiceRow {
    pub id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub client_id: Uuid,
    pub barber_id: Uuid,
    pub status: String,
    pub line_items: serde_json::Value,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub barber_id: Uuid,
    pub client_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Push subscriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = push_subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PushSubscriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = gallery_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GalleryImageRow {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub storage_key: String,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Row to domain conversion
// ---------------------------------------------------------------------------

/// A stored value that no longer satisfies the domain's invariants.
#[derive(Debug, thiserror::Error)]
#[error("stored {column} is invalid: {message}")]
pub(crate) struct RowConversionError {
    column: &'static str,
    message: String,
}

fn invalid(column: &'static str) -> impl FnOnce(String) -> RowConversionError {
    move |message| RowConversionError { column, message }
}

fn check<T, E: Display>(column: &'static str, value: Result<T, E>) -> Result<T, RowConversionError> {
    value.map_err(|err| invalid(column)(err.to_string()))
}

fn unsigned<T: TryFrom<I>, I: Copy + Display>(
    column: &'static str,
    value: I,
) -> Result<T, RowConversionError> {
    T::try_from(value).map_err(|_| invalid(column)(format!("{value} is out of range")))
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, RowConversionError> {
        Ok(User {
            id: UserId::from_uuid(self.id),
            email: check("email", Email::new(&self.email))?,
            display_name: check("display_name", DisplayName::new(self.display_name))?,
            role: parse_role(&self.role)?,
            phone: self.phone,
            image_url: self.image_url,
            created_at: self.created_at,
        })
    }
}

impl From<ProviderProfileRow> for ProviderProfile {
    fn from(row: ProviderProfileRow) -> Self {
        Self {
            bio: row.bio,
            instagram_url: row.instagram_url,
            tiktok_url: row.tiktok_url,
            facebook_url: row.facebook_url,
            website_url: row.website_url,
        }
    }
}

impl ServiceRow {
    pub(crate) fn into_domain(self) -> Result<ServiceOffering, RowConversionError> {
        Ok(ServiceOffering {
            id: self.id,
            barber_id: UserId::from_uuid(self.barber_id),
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            duration_minutes: unsigned("duration_minutes", self.duration_minutes)?,
            created_at: self.created_at,
        })
    }
}

impl AvailabilityRow {
    pub(crate) fn into_domain(self) -> Result<AvailabilityWindow, RowConversionError> {
        let day = check("day_of_week", DayOfWeek::from_index(i64::from(self.day_of_week)))?;
        let minute = |column: &'static str, value: i32| {
            unsigned::<u16, _>(column, value)
                .and_then(|m| TimeOfDay::from_minutes(m).ok_or_else(|| invalid(column)(m.to_string())))
        };
        let start = minute("start_minute", self.start_minute)?;
        let end = minute("end_minute", self.end_minute)?;
        check("end_minute", AvailabilityWindow::new(day, start, end))
    }
}

pub(crate) fn parse_platform(value: &str) -> Result<SocialPlatform, RowConversionError> {
    check("platform", value.parse::<SocialPlatform>())
}

pub(crate) fn parse_role(value: &str) -> Result<Role, RowConversionError> {
    check("role", value.parse::<Role>())
}

pub(crate) fn parse_status(value: &str) -> Result<AppointmentStatus, RowConversionError> {
    check("status", value.parse::<AppointmentStatus>())
}

impl AppointmentRow {
    pub(crate) fn into_domain(self) -> Result<Appointment, RowConversionError> {
        Ok(Appointment {
            id: self.id,
            client_id: UserId::from_uuid(self.client_id),
            barber_id: UserId::from_uuid(self.barber_id),
            service_id: self.service_id,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            status: parse_status(&self.status)?,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PromotionRow {
    pub(crate) fn into_domain(self) -> Result<Promotion, RowConversionError> {
        Ok(Promotion {
            id: self.id,
            barber_id: self.barber_id.map(UserId::from_uuid),
            title: self.title,
            description: self.description,
            discount_percent: unsigned("discount_percent", self.discount_percent)?,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            active: self.active,
            created_at: self.created_at,
        })
    }
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            sender_id: UserId::from_uuid(row.sender_id),
            recipient_id: UserId::from_uuid(row.recipient_id),
            body: row.body,
            read_at: row.read_at,
            created_at: row.created_at,
        }
    }
}

impl InvoiceRow {
    pub(crate) fn into_domain(self) -> Result<Invoice, RowConversionError> {
        let line_items: Vec<LineItem> =
            check("line_items", serde_json::from_value(self.line_items))?;
        Ok(Invoice {
            id: self.id,
            appointment_id: self.appointment_id,
            client_id: UserId::from_uuid(self.client_id),
            barber_id: UserId::from_uuid(self.barber_id),
            status: check("status", self.status.parse::<InvoiceStatus>())?,
            line_items,
            totals: InvoiceTotals {
                subtotal_cents: self.subtotal_cents,
                discount_cents: self.discount_cents,
                total_cents: self.total_cents,
            },
            issued_at: self.issued_at,
            paid_at: self.paid_at,
        })
    }
}

impl ReviewRow {
    /// Reviews are always shown with the client's display name.
    pub(crate) fn into_domain(self, client_name: String) -> Result<Review, RowConversionError> {
        Ok(Review {
            id: self.id,
            appointment_id: self.appointment_id,
            barber_id: UserId::from_uuid(self.barber_id),
            client_id: UserId::from_uuid(self.client_id),
            client_name,
            rating: check("rating", Rating::new(i64::from(self.rating)))?,
            comment: self.comment,
            response: self.response,
            responded_at: self.responded_at,
            created_at: self.created_at,
        })
    }
}

impl From<PushSubscriptionRow> for PushSubscription {
    fn from(row: PushSubscriptionRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            endpoint: row.endpoint,
            p256dh: row.p256dh,
            auth: row.auth,
            created_at: row.created_at,
        }
    }
}

impl From<GalleryImageRow> for GalleryImage {
    fn from(row: GalleryImageRow) -> Self {
        Self {
            id: row.id,
            barber_id: UserId::from_uuid(row.barber_id),
            storage_key: row.storage_key,
            url: row.url,
            caption: row.caption,
            created_at: row.created_at,
        }
    }
}

impl From<&GalleryImage> for GalleryImageRow {
    fn from(image: &GalleryImage) -> Self {
        Self {
            id: image.id,
            barber_id: *image.barber_id.as_uuid(),
            storage_key: image.storage_key.clone(),
            url: image.url.clone(),
            caption: image.caption.clone(),
            created_at: image.created_at,
        }
    }
}
