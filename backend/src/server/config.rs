//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use barberbook::domain::RetentionPolicy;
use barberbook::outbound::media::LocalMediaStore;
use barberbook::outbound::persistence::DbPool;
use barberbook::outbound::push::WebhookPushSender;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Outbound adapters that do not depend on the database.
#[derive(Clone)]
pub struct ServerAdapters {
    pub media: LocalMediaStore,
    pub push: WebhookPushSender,
    pub password_cost: u32,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) adapters: ServerAdapters,
    pub(crate) retention: RetentionPolicy,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from session preferences and the
    /// non-database adapters.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        adapters: ServerAdapters,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            adapters,
            retention: RetentionPolicy::default(),
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one every repository is served by its fixture, which keeps
    /// the API browsable without PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the retention used by `POST /admin/maintenance/sweep`.
    #[must_use]
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by the bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
