//! Barberbook backend library: domain, adapters and the OpenAPI surface.
//!
//! The binaries in `src/main.rs` and `src/bin/` compose these modules; the
//! library itself never starts a runtime or reads the process environment
//! outside [`config`].

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
