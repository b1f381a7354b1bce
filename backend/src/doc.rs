//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers:
//!
//! - **Paths**: every `/api/v1` handler plus the health probes.
//! - **Schemas**: the wrappers in [`crate::inbound::http::schemas`], which
//!   mirror domain JSON without coupling the domain to utoipa, and the
//!   request DTOs owned by each handler module.
//! - **Security**: the session cookie scheme.
//!
//! Swagger UI serves it in debug builds and `cargo run --bin openapi-dump`
//! prints it for external tooling.

use crate::inbound::http::schemas::{
    AppointmentDetailsSchema, AppointmentSchema, AvailabilityWindowSchema, ClickSummarySchema,
    CommentSchema, DispatchReportSchema, ErrorCodeSchema, ErrorSchema, GalleryImageSchema,
    InvoiceSchema, LikeOutcomeSchema, MessageSchema, PostSchema, PromotionSchema,
    ProviderDetailSchema, ProviderProfileSchema, ProviderSchema, PushSubscriptionSchema,
    ReviewSchema, ReviewSummarySchema, ServiceOfferingSchema, SlotSchema, SummaryReportSchema,
    SweepReportSchema, UnreadCountSchema, UserSchema,
};
use crate::inbound::http::{
    accounts, admin, appointments, gallery, health, invoices, messages, posts, promotions,
    providers, push, reviews,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Barberbook API",
        description = "Booking, provider profiles, promotions, social feed, messaging, \
                       invoicing and reviews for barbershops and salons."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        accounts::register,
        accounts::login,
        accounts::logout,
        accounts::current_user,
        accounts::update_current_user,
        accounts::list_users,
        accounts::change_role,
        providers::list_providers,
        providers::get_provider,
        providers::upsert_profile,
        providers::create_service,
        providers::update_service,
        providers::delete_service,
        providers::set_availability,
        providers::open_slots,
        providers::record_click,
        providers::click_summary,
        appointments::book,
        appointments::list_appointments,
        appointments::export_csv,
        appointments::get_appointment,
        appointments::appointment_calendar,
        appointments::provider_calendar,
        appointments::confirm,
        appointments::complete,
        appointments::cancel,
        appointments::mark_no_show,
        promotions::list_promotions,
        promotions::create_promotion,
        promotions::deactivate_promotion,
        posts::list_posts,
        posts::create_post,
        posts::get_post,
        posts::delete_post,
        posts::toggle_like,
        posts::list_comments,
        posts::add_comment,
        posts::delete_comment,
        messages::send_message,
        messages::unread_count,
        messages::conversation,
        messages::mark_read,
        invoices::create_invoice,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::pay_invoice,
        reviews::create_review,
        reviews::respond,
        reviews::list_reviews,
        push::subscribe,
        push::unsubscribe,
        push::send_test,
        gallery::upload,
        gallery::list_gallery,
        gallery::delete_image,
        admin::summary_report,
        admin::run_sweep,
        health::ready,
        health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        ProviderSchema,
        ProviderProfileSchema,
        ProviderDetailSchema,
        ServiceOfferingSchema,
        AvailabilityWindowSchema,
        SlotSchema,
        ClickSummarySchema,
        AppointmentSchema,
        AppointmentDetailsSchema,
        PromotionSchema,
        PostSchema,
        CommentSchema,
        LikeOutcomeSchema,
        MessageSchema,
        UnreadCountSchema,
        InvoiceSchema,
        ReviewSchema,
        ReviewSummarySchema,
        PushSubscriptionSchema,
        DispatchReportSchema,
        GalleryImageSchema,
        SummaryReportSchema,
        SweepReportSchema,
        accounts::RegisterRequest,
        accounts::LoginRequest,
        accounts::UpdateProfileRequest,
        accounts::ChangeRoleRequest,
        providers::ProfileRequest,
        providers::ServiceRequest,
        providers::ServicePatchRequest,
        providers::DayInput,
        providers::WindowRequest,
        providers::AvailabilityRequest,
        providers::ClickRequest,
        appointments::BookRequest,
        promotions::PromotionRequest,
        posts::PostRequest,
        posts::CommentRequest,
        messages::SendMessageRequest,
        messages::MarkedRead,
        invoices::CreateInvoiceRequest,
        reviews::ReviewRequest,
        reviews::ReviewResponseRequest,
        push::SubscriptionKeys,
        push::SubscribeRequest,
        push::UnsubscribeRequest,
        push::TestPushRequest,
    )),
    tags(
        (name = "auth", description = "Registration and session login"),
        (name = "users", description = "Accounts and roles"),
        (name = "providers", description = "Provider pages, services, availability and link clicks"),
        (name = "appointments", description = "Booking lifecycle and calendar exports"),
        (name = "promotions", description = "Time-boxed discounts"),
        (name = "social", description = "Feed posts, likes and comments"),
        (name = "messages", description = "Direct messages"),
        (name = "invoices", description = "Invoices and payment recording"),
        (name = "reviews", description = "Ratings and provider responses"),
        (name = "push", description = "Web push subscriptions"),
        (name = "gallery", description = "Provider portfolio images"),
        (name = "admin", description = "Reports and maintenance"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
