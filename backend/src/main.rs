//! Backend entry-point: loads settings, runs migrations and serves the REST
//! API with its OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, eyre};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use barberbook::config::ServerSettings;
use barberbook::inbound::http::health::HealthState;
use barberbook::inbound::http::session_config::{BuildMode, session_settings_from_env};
use barberbook::outbound::media::LocalMediaStore;
use barberbook::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use barberbook::outbound::push::WebhookPushSender;
use ortho_config::OrthoConfig as _;

use server::{ServerAdapters, ServerConfig, create_server};

/// bcrypt work factor for stored password hashes.
const PASSWORD_COST: u32 = 12;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    session.log_summary();

    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;
    let adapters = ServerAdapters {
        media: LocalMediaStore::open(settings.media_dir(), settings.media_base_url())
            .wrap_err_with(|| format!("failed to open media dir {}", settings.media_dir().display()))?,
        push: WebhookPushSender::new(settings.push_timeout())
            .wrap_err("failed to build push client")?,
        password_cost: PASSWORD_COST,
    };

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        adapters,
    )
    .with_retention(settings.retention());

    match settings.database_url() {
        Some(url) => {
            let applied = run_pending_migrations(url)
                .await
                .wrap_err("failed to apply migrations")?;
            info!(applied, "database migrations up to date");
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .wrap_err("failed to build database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; serving fixture repositories"),
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::prometheus_metrics());

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    let server = create_server(health_state.clone(), config)?;
    server.await?;
    health_state.mark_draining();
    Ok(())
}
