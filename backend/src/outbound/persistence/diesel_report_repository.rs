//! PostgreSQL-backed `ReportRepository`: read-only aggregates for the admin
//! summary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text, Timestamptz, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ReportQueryError, ReportRepository};
use crate::domain::{AppointmentStatus, InvoiceStatus, ProviderRanking, Role, UserId};

use super::error_mapping::{count_u64, impl_persistence_error_from};
use super::models::{parse_role, parse_status};
use super::pool::DbPool;
use super::schema::{appointments, posts, users};

impl_persistence_error_from!(ReportQueryError);

const PAID_REVENUE_SQL: &str = "\
SELECT COALESCE(SUM(total_cents), 0)::int8 AS cents \
FROM invoices \
WHERE status = $1 AND paid_at >= $2 AND paid_at < $3";

const TOP_PROVIDERS_SQL: &str = "\
SELECT a.barber_id, u.display_name, COUNT(*) AS completed \
FROM appointments a \
JOIN users u ON u.id = a.barber_id \
WHERE a.status = $1 AND a.starts_at >= $2 AND a.starts_at < $3 \
GROUP BY a.barber_id, u.display_name \
ORDER BY completed DESC, u.display_name ASC \
LIMIT $4";

#[derive(Debug, QueryableByName)]
struct RevenueRow {
    #[diesel(sql_type = BigInt)]
    cents: i64,
}

#[derive(Debug, QueryableByName)]
struct RankingRow {
    #[diesel(sql_type = SqlUuid)]
    barber_id: Uuid,
    #[diesel(sql_type = Text)]
    display_name: String,
    #[diesel(sql_type = BigInt)]
    completed: i64,
}

/// Diesel implementation of [`ReportRepository`].
#[derive(Clone)]
pub struct DieselReportRepository {
    pool: DbPool,
}

impl DieselReportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for DieselReportRepository {
    async fn users_by_role(&self) -> Result<Vec<(Role, u64)>, ReportQueryError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<(String, i64)> = users::table
            .group_by(users::role)
            .select((users::role, count_star()))
            .load(&mut conn)
            .await?;
        rows.into_iter()
            .map(|(role, count)| -> Result<_, ReportQueryError> {
                Ok((parse_role(&role)?, count_u64(count)))
            })
            .collect()
    }

    async fn appointments_by_status(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(AppointmentStatus, u64)>, ReportQueryError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<(String, i64)> = appointments::table
            .filter(appointments::starts_at.ge(from))
            .filter(appointments::starts_at.lt(to))
            .group_by(appointments::status)
            .select((appointments::status, count_star()))
            .load(&mut conn)
            .await?;
        rows.into_iter()
            .map(|(status, count)| -> Result<_, ReportQueryError> {
                Ok((parse_status(&status)?, count_u64(count)))
            })
            .collect()
    }

    async fn paid_revenue_cents(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, ReportQueryError> {
        let mut conn = self.pool.get().await?;
        let row: RevenueRow = diesel::sql_query(PAID_REVENUE_SQL)
            .bind::<Text, _>(InvoiceStatus::Paid.as_str())
            .bind::<Timestamptz, _>(from)
            .bind::<Timestamptz, _>(to)
            .get_result(&mut conn)
            .await?;
        Ok(row.cents)
    }

    async fn posts_created(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, ReportQueryError> {
        let mut conn = self.pool.get().await?;
        let count: i64 = posts::table
            .filter(posts::created_at.ge(from))
            .filter(posts::created_at.lt(to))
            .select(count_star())
            .first(&mut conn)
            .await?;
        Ok(count_u64(count))
    }

    async fn top_providers(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ProviderRanking>, ReportQueryError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<RankingRow> = diesel::sql_query(TOP_PROVIDERS_SQL)
            .bind::<Text, _>(AppointmentStatus::Completed.as_str())
            .bind::<Timestamptz, _>(from)
            .bind::<Timestamptz, _>(to)
            .bind::<BigInt, _>(i64::try_from(limit).unwrap_or(i64::MAX))
            .load(&mut conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| ProviderRanking {
                barber_id: UserId::from_uuid(row.barber_id),
                display_name: row.display_name,
                completed: count_u64(row.completed),
            })
            .collect())
    }
}
