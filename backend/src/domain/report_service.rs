//! Admin summary reporting.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::ports::{ReportRepository, Reports};
use crate::domain::reporting::{TOP_PROVIDERS, complete_role_counts, complete_status_counts};
use crate::domain::repository_errors::map_report_error;
use crate::domain::{Error, Principal, Revenue, SummaryReport};

/// Report service implementing the [`Reports`] driving port.
#[derive(Clone)]
pub struct ReportService<R> {
    reports: Arc<R>,
}

impl<R> ReportService<R> {
    pub fn new(reports: Arc<R>) -> Self {
        Self { reports }
    }
}

#[async_trait]
impl<R> Reports for ReportService<R>
where
    R: ReportRepository,
{
    async fn summary(
        &self,
        caller: &Principal,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<SummaryReport, Error> {
        caller.require_admin()?;
        if from >= to {
            return Err(Error::invalid_request("`from` must be before `to`"));
        }

        let users = self.reports.users_by_role().await.map_err(map_report_error)?;
        let statuses = self
            .reports
            .appointments_by_status(from, to)
            .await
            .map_err(map_report_error)?;
        let revenue = self
            .reports
            .paid_revenue_cents(from, to)
            .await
            .map_err(map_report_error)?;
        let new_posts = self
            .reports
            .posts_created(from, to)
            .await
            .map_err(map_report_error)?;
        let mut top_providers = self
            .reports
            .top_providers(from, to, TOP_PROVIDERS)
            .await
            .map_err(map_report_error)?;
        top_providers.truncate(TOP_PROVIDERS);

        debug!(%from, %to, "summary report built");
        Ok(SummaryReport {
            from,
            to,
            users_by_role: complete_role_counts(&users),
            appointments_by_status: complete_status_counts(&statuses),
            revenue: Revenue::from_cents(revenue),
            new_posts,
            top_providers,
        })
    }
}
