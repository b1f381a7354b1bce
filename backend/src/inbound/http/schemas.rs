//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their JSON shape so utoipa can document responses
//! without the domain depending on it.

use serde::Serialize;
use utoipa::ToSchema;

/// Stable machine-readable error codes returned in API error responses.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// API error envelope.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Something went wrong")]
    message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// Account as exposed to callers.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::User)]
#[serde(rename_all = "camelCase")]
pub struct UserSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "Ada Lovelace")]
    display_name: String,
    #[schema(example = "CLIENT")]
    role: String,
    phone: Option<String>,
    image_url: Option<String>,
    created_at: String,
}

/// Publicly listed provider.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Provider)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSchema {
    id: String,
    display_name: String,
    #[schema(example = "BARBER")]
    role: String,
    image_url: Option<String>,
    profile: Option<ProviderProfileSchema>,
}

/// Bio and social links.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ProviderProfile)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfileSchema {
    bio: String,
    instagram_url: Option<String>,
    tiktok_url: Option<String>,
    facebook_url: Option<String>,
    website_url: Option<String>,
}

/// One weekly availability window.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::AvailabilityWindow)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindowSchema {
    #[schema(example = "MONDAY")]
    day_of_week: String,
    #[schema(example = "09:00")]
    start: String,
    #[schema(example = "17:30")]
    end: String,
}

/// A service on a provider's menu.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ServiceOffering)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOfferingSchema {
    id: String,
    barber_id: String,
    #[schema(example = "Skin fade")]
    name: String,
    description: Option<String>,
    #[schema(example = 3000)]
    price_cents: i64,
    #[schema(example = 45)]
    duration_minutes: u32,
    created_at: String,
}

/// Provider page with menu and availability.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ProviderDetail)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDetailSchema {
    #[serde(flatten)]
    provider: ProviderSchema,
    services: Vec<ServiceOfferingSchema>,
    availability: Vec<AvailabilityWindowSchema>,
}

/// Bookable slot.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Slot)]
#[serde(rename_all = "camelCase")]
pub struct SlotSchema {
    starts_at: String,
    ends_at: String,
}

/// Click counts per platform.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ClickSummary)]
pub struct ClickSummarySchema {
    #[schema(value_type = Vec<Object>)]
    platforms: Vec<serde_json::Value>,
    total: u64,
}

/// A booked appointment.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Appointment)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSchema {
    id: String,
    client_id: String,
    barber_id: String,
    service_id: String,
    starts_at: String,
    ends_at: String,
    #[schema(example = "PENDING")]
    status: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

/// Appointment with names and price.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::AppointmentDetails)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetailsSchema {
    #[serde(flatten)]
    appointment: AppointmentSchema,
    client_name: String,
    barber_name: String,
    service_name: String,
    price_cents: i64,
}

/// Time-bounded discount.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Promotion)]
#[serde(rename_all = "camelCase")]
pub struct PromotionSchema {
    id: String,
    barber_id: Option<String>,
    title: String,
    description: Option<String>,
    #[schema(example = 15)]
    discount_percent: u8,
    starts_at: String,
    ends_at: String,
    active: bool,
    created_at: String,
}

/// Feed post.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Post)]
#[serde(rename_all = "camelCase")]
pub struct PostSchema {
    id: String,
    author_id: String,
    author_name: String,
    content: String,
    image_url: Option<String>,
    like_count: u32,
    comment_count: u32,
    created_at: String,
}

/// Comment on a post.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Comment)]
#[serde(rename_all = "camelCase")]
pub struct CommentSchema {
    id: String,
    post_id: String,
    author_id: String,
    author_name: String,
    content: String,
    created_at: String,
}

/// Like toggle outcome.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::LikeOutcome)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcomeSchema {
    liked: bool,
    like_count: u32,
}

/// Direct message.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Message)]
#[serde(rename_all = "camelCase")]
pub struct MessageSchema {
    id: String,
    sender_id: String,
    recipient_id: String,
    body: String,
    read_at: Option<String>,
    created_at: String,
}

/// Unread message counter.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::UnreadCount)]
pub struct UnreadCountSchema {
    unread: u64,
}

/// Invoice with totals in cents.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Invoice)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSchema {
    id: String,
    appointment_id: Option<String>,
    client_id: String,
    barber_id: String,
    #[schema(example = "ISSUED")]
    status: String,
    #[schema(value_type = Vec<Object>)]
    line_items: Vec<serde_json::Value>,
    subtotal_cents: i64,
    discount_cents: i64,
    total_cents: i64,
    issued_at: String,
    paid_at: Option<String>,
}

/// Review with the provider's response.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Review)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchema {
    id: String,
    appointment_id: String,
    barber_id: String,
    client_id: String,
    client_name: String,
    #[schema(example = 5)]
    rating: u8,
    comment: Option<String>,
    response: Option<String>,
    responded_at: Option<String>,
    created_at: String,
}

/// Reviews of one provider with the average rating.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ReviewSummary)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummarySchema {
    barber_id: String,
    average_rating: Option<f64>,
    review_count: usize,
    reviews: Vec<ReviewSchema>,
}

/// Registered push subscription.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::PushSubscription)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionSchema {
    id: String,
    user_id: String,
    endpoint: String,
    p256dh: String,
    auth: String,
    created_at: String,
}

/// Push dispatch tally.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::DispatchReport)]
pub struct DispatchReportSchema {
    delivered: usize,
    removed: usize,
    failed: usize,
}

/// Stored gallery image.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::GalleryImage)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageSchema {
    id: String,
    barber_id: String,
    url: String,
    caption: Option<String>,
    created_at: String,
}

/// Admin summary over a date range.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::SummaryReport)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReportSchema {
    from: String,
    to: String,
    #[schema(value_type = Vec<Object>)]
    users_by_role: Vec<serde_json::Value>,
    #[schema(value_type = Vec<Object>)]
    appointments_by_status: Vec<serde_json::Value>,
    #[schema(value_type = Object, example = json!({"cents": 123456, "formatted": "$1234.56"}))]
    revenue: serde_json::Value,
    new_posts: u64,
    #[schema(value_type = Vec<Object>)]
    top_providers: Vec<serde_json::Value>,
}

/// Rows affected by a maintenance sweep.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::SweepReport)]
#[serde(rename_all = "camelCase")]
pub struct SweepReportSchema {
    appointments_deleted: u64,
    posts_deleted: u64,
    promotions_expired: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"), "{json}");
    }

    #[test]
    fn appointment_details_flatten_the_appointment() {
        let json = schema_to_json::<AppointmentDetailsSchema>();
        assert!(json.contains("startsAt"), "{json}");
        assert!(json.contains("barberName"), "{json}");
    }
}
