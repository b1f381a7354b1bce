//! Process settings loaded via OrthoConfig.
//!
//! Every field can be set from the command line, a config file, or an
//! environment variable prefixed with `BARBERBOOK_`. Unset fields fall back
//! to the defaults exposed by the accessors below.

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::RetentionPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_DIR: &str = "media";
const DEFAULT_MEDIA_BASE_URL: &str = "/media";
const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 5;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings shared by the HTTP server and the maintenance sweep.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BARBERBOOK")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server runs on fixture repositories.
    pub database_url: Option<String>,
    /// Upper bound for pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Directory holding uploaded gallery images.
    pub media_dir: Option<PathBuf>,
    /// Public URL prefix under which `media_dir` is served.
    pub media_base_url: Option<String>,
    /// Per-request timeout for push deliveries, in seconds.
    pub push_timeout_secs: Option<u64>,
    /// Days a finished appointment is kept before the sweep deletes it.
    pub appointment_retention_days: Option<u32>,
    /// Days a feed post is kept before the sweep deletes it.
    pub post_retention_days: Option<u32>,
}

impl ServerSettings {
    /// Parsed listener address.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn media_dir(&self) -> &Path {
        self.media_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_MEDIA_DIR))
    }

    pub fn media_base_url(&self) -> &str {
        self.media_base_url
            .as_deref()
            .unwrap_or(DEFAULT_MEDIA_BASE_URL)
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_secs(self.push_timeout_secs.unwrap_or(DEFAULT_PUSH_TIMEOUT_SECS))
    }

    /// Retention policy with configured overrides applied.
    pub fn retention(&self) -> RetentionPolicy {
        let defaults = RetentionPolicy::default();
        RetentionPolicy {
            appointment_days: self
                .appointment_retention_days
                .unwrap_or(defaults.appointment_days),
            post_days: self.post_retention_days.unwrap_or(defaults.post_days),
        }
    }
}
