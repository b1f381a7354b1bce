//! Read-only aggregate queries backing the admin summary.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AppointmentStatus, ProviderRanking, Role};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reporting adapters.
    pub enum ReportQueryError {
        /// Repository connection could not be established.
        Connection { message: String } => "report repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "report repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Sparse counts of all users by role.
    async fn users_by_role(&self) -> Result<Vec<(Role, u64)>, ReportQueryError>;

    /// Sparse counts of appointments starting in `[from, to)` by status.
    async fn appointments_by_status(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(AppointmentStatus, u64)>, ReportQueryError>;

    /// Sum of totals of invoices paid in `[from, to)`.
    async fn paid_revenue_cents(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, ReportQueryError>;

    async fn posts_created(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, ReportQueryError>;

    /// Providers with the most COMPLETED appointments starting in `[from, to)`.
    async fn top_providers(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ProviderRanking>, ReportQueryError>;
}

/// Repository used when no database is configured; every aggregate is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReportRepository;

#[async_trait]
impl ReportRepository for FixtureReportRepository {
    async fn users_by_role(&self) -> Result<Vec<(Role, u64)>, ReportQueryError> {
        Ok(Vec::new())
    }

    async fn appointments_by_status(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<(AppointmentStatus, u64)>, ReportQueryError> {
        Ok(Vec::new())
    }

    async fn paid_revenue_cents(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<i64, ReportQueryError> {
        Ok(0)
    }

    async fn posts_created(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<u64, ReportQueryError> {
        Ok(0)
    }

    async fn top_providers(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
        _limit: usize,
    ) -> Result<Vec<ProviderRanking>, ReportQueryError> {
        Ok(Vec::new())
    }
}
