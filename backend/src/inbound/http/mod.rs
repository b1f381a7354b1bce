//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod accounts;
pub mod admin;
pub mod appointments;
pub mod cache_control;
pub mod error;
pub mod gallery;
pub mod health;
pub mod invoices;
pub mod messages;
pub mod paging;
pub mod posts;
pub mod promotions;
pub mod providers;
pub mod push;
pub mod reviews;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Literal segments are registered before their `{id}` siblings so that
/// `/appointments/export.csv` is not captured as an appointment id.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_user)
        .service(accounts::update_current_user)
        .service(accounts::list_users)
        .service(accounts::change_role)
        .service(providers::list_providers)
        .service(providers::upsert_profile)
        .service(providers::create_service)
        .service(providers::set_availability)
        .service(providers::get_provider)
        .service(providers::update_service)
        .service(providers::delete_service)
        .service(providers::open_slots)
        .service(providers::record_click)
        .service(providers::click_summary)
        .service(appointments::book)
        .service(appointments::list_appointments)
        .service(appointments::export_csv)
        .service(appointments::get_appointment)
        .service(appointments::appointment_calendar)
        .service(appointments::provider_calendar)
        .service(appointments::confirm)
        .service(appointments::complete)
        .service(appointments::cancel)
        .service(appointments::mark_no_show)
        .service(promotions::list_promotions)
        .service(promotions::create_promotion)
        .service(promotions::deactivate_promotion)
        .service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::delete_post)
        .service(posts::toggle_like)
        .service(posts::list_comments)
        .service(posts::add_comment)
        .service(posts::delete_comment)
        .service(messages::send_message)
        .service(messages::unread_count)
        .service(messages::conversation)
        .service(messages::mark_read)
        .service(invoices::create_invoice)
        .service(invoices::list_invoices)
        .service(invoices::get_invoice)
        .service(invoices::pay_invoice)
        .service(reviews::create_review)
        .service(reviews::respond)
        .service(reviews::list_reviews)
        .service(push::subscribe)
        .service(push::unsubscribe)
        .service(push::send_test)
        .service(gallery::upload)
        .service(gallery::list_gallery)
        .service(gallery::delete_image)
        .service(admin::summary_report)
        .service(admin::run_sweep);
}
