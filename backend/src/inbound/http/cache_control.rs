//! Cache-control policies shared by handlers.

use actix_web::http::header::CACHE_CONTROL;

/// Per-user responses must be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Probes and file exports must never be cached.
pub const NO_STORE: &str = "no-store";

/// Header tuple for private API responses.
pub const fn private_no_cache_header() -> (actix_web::http::header::HeaderName, &'static str) {
    (CACHE_CONTROL, PRIVATE_NO_CACHE_MUST_REVALIDATE)
}

/// Header tuple for responses that must not be stored.
pub const fn no_store_header() -> (actix_web::http::header::HeaderName, &'static str) {
    (CACHE_CONTROL, NO_STORE)
}
