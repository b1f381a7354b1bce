//! Run the retention sweep once against the configured database.
//!
//! Deletes finished appointments and old posts past their retention window
//! and deactivates ended promotions, then prints the counts as JSON. Meant
//! to be scheduled by cron or a Kubernetes `CronJob`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use barberbook::config::ServerSettings;
use barberbook::domain::{MaintenanceService, RetentionPolicy};
use barberbook::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselPromotionRepository, DieselSocialRepository,
    PoolConfig,
};
use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{Context, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig as _;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// `maintenance-sweep` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "maintenance-sweep",
    about = "Delete expired appointments and posts and deactivate ended promotions",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `BARBERBOOK_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Override the appointment retention in days.
    #[arg(long = "appointment-days", value_name = "days")]
    appointment_days: Option<u32>,
    /// Override the post retention in days.
    #[arg(long = "post-days", value_name = "days")]
    post_days: Option<u32>,
}

impl CliArgs {
    fn retention(&self, configured: RetentionPolicy) -> RetentionPolicy {
        RetentionPolicy {
            appointment_days: self.appointment_days.unwrap_or(configured.appointment_days),
            post_days: self.post_days.unwrap_or(configured.post_days),
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> color_eyre::Result<()> {
    let args = CliArgs::parse();
    // Command-line flags belong to clap; settings come from env and files.
    let settings = ServerSettings::load_from_iter([OsString::from("maintenance-sweep")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = args
        .database_url
        .clone()
        .or_else(|| settings.database_url().map(str::to_owned))
        .ok_or_else(|| eyre!("no database URL: pass --database-url or set BARBERBOOK_DATABASE_URL"))?;
    let retention = args.retention(settings.retention());

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(2))
        .await
        .wrap_err("create database pool")?;
    let service = MaintenanceService::new(
        Arc::new(DieselAppointmentRepository::new(pool.clone())),
        Arc::new(DieselSocialRepository::new(pool.clone())),
        Arc::new(DieselPromotionRepository::new(pool)),
        retention,
        Arc::new(DefaultClock),
    );

    let report = service.run(Utc::now()).await.wrap_err("sweep failed")?;
    info!(
        appointments_deleted = report.appointments_deleted,
        posts_deleted = report.posts_deleted,
        promotions_expired = report.promotions_expired,
        "maintenance sweep finished"
    );
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
