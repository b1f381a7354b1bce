//! PostgreSQL-backed `AppointmentRepository`.
//!
//! Bookings take a row lock on the provider before the overlap check so two
//! concurrent requests for the same provider serialise.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text, Timestamptz, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AppointmentPersistenceError, AppointmentRepository};
use crate::domain::{
    Appointment, AppointmentDetails, AppointmentFilter, AppointmentStatus, NewAppointment, UserId,
};

use super::error_mapping::{impl_persistence_error_from, rows_u64};
use super::models::AppointmentRow;
use super::pool::DbPool;
use super::schema::{appointments, users};

impl_persistence_error_from!(AppointmentPersistenceError);

const DETAILS_SELECT: &str = "\
SELECT a.id, a.client_id, a.barber_id, a.service_id, a.starts_at, a.ends_at, a.status, \
       a.notes, a.created_at, a.updated_at, \
       c.display_name AS client_name, b.display_name AS barber_name, \
       s.name AS service_name, s.price_cents \
FROM appointments a \
JOIN users c ON c.id = a.client_id \
JOIN users b ON b.id = a.barber_id \
JOIN services s ON s.id = a.service_id";

/// Appointment joined with display names, read through raw SQL because
/// `users` appears twice.
#[derive(Debug, QueryableByName)]
struct AppointmentDetailsRow {
    #[diesel(sql_type = SqlUuid)]
    id: Uuid,
    #[diesel(sql_type = SqlUuid)]
    client_id: Uuid,
    #[diesel(sql_type = SqlUuid)]
    barber_id: Uuid,
    #[diesel(sql_type = SqlUuid)]
    service_id: Uuid,
    #[diesel(sql_type = Timestamptz)]
    starts_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    ends_at: DateTime<Utc>,
    #[diesel(sql_type = Text)]
    status: String,
    #[diesel(sql_type = Nullable<Text>)]
    notes: Option<String>,
    #[diesel(sql_type = Timestamptz)]
    created_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    updated_at: DateTime<Utc>,
    #[diesel(sql_type = Text)]
    client_name: String,
    #[diesel(sql_type = Text)]
    barber_name: String,
    #[diesel(sql_type = Text)]
    service_name: String,
    #[diesel(sql_type = BigInt)]
    price_cents: i64,
}

impl AppointmentDetailsRow {
    fn into_domain(self) -> Result<AppointmentDetails, AppointmentPersistenceError> {
        let appointment = AppointmentRow {
            id: self.id,
            client_id: self.client_id,
            barber_id: self.barber_id,
            service_id: self.service_id,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            status: self.status,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_domain()?;
        Ok(AppointmentDetails {
            appointment,
            client_name: self.client_name,
            barber_name: self.barber_name,
            service_name: self.service_name,
            price_cents: self.price_cents,
        })
    }
}

fn statuses(set: &[AppointmentStatus]) -> Vec<&'static str> {
    set.iter().map(|status| status.as_str()).collect()
}

/// Diesel implementation of [`AppointmentRepository`].
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn create_if_free(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentPersistenceError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let now = Utc::now();
        let row = AppointmentRow {
            id: Uuid::new_v4(),
            client_id: *appointment.client_id.as_uuid(),
            barber_id: *appointment.barber_id.as_uuid(),
            service_id: appointment.service_id,
            starts_at: appointment.starts_at,
            ends_at: appointment.ends_at,
            status: AppointmentStatus::Pending.as_str().to_owned(),
            notes: appointment.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        let active = statuses(&AppointmentStatus::ACTIVE);
        let mut conn = self.pool.get().await?;

        let stored: AppointmentRow = conn
            .transaction::<_, AppointmentPersistenceError, _>(|conn| {
                async move {
                    users::table
                        .find(row.barber_id)
                        .select(users::id)
                        .for_update()
                        .first::<Uuid>(conn)
                        .await?;

                    let clash: bool = diesel::select(exists(
                        appointments::table
                            .filter(appointments::barber_id.eq(row.barber_id))
                            .filter(appointments::status.eq_any(active))
                            .filter(appointments::starts_at.lt(row.ends_at))
                            .filter(appointments::ends_at.gt(row.starts_at)),
                    ))
                    .get_result(conn)
                    .await?;
                    if clash {
                        return Err(AppointmentPersistenceError::overlap());
                    }

                    let stored = diesel::insert_into(appointments::table)
                        .values(&row)
                        .returning(AppointmentRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(stored)
                }
                .scope_boxed()
            })
            .await?;
        Ok(stored.into_domain()?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<AppointmentRow> = appointments::table
            .find(id)
            .select(AppointmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(AppointmentRow::into_domain).transpose()?)
    }

    async fn find_details(
        &self,
        id: Uuid,
    ) -> Result<Option<AppointmentDetails>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<AppointmentDetailsRow> =
            diesel::sql_query(format!("{DETAILS_SELECT} WHERE a.id = $1"))
                .bind::<SqlUuid, _>(id)
                .get_result(&mut conn)
                .await
                .optional()?;
        row.map(AppointmentDetailsRow::into_domain).transpose()
    }

    async fn list_details(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentDetails>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<AppointmentDetailsRow> = diesel::sql_query(format!(
            "{DETAILS_SELECT} \
             WHERE ($1::uuid IS NULL OR a.client_id = $1) \
               AND ($2::uuid IS NULL OR a.barber_id = $2) \
               AND ($3::timestamptz IS NULL OR a.starts_at >= $3) \
               AND ($4::timestamptz IS NULL OR a.starts_at < $4) \
             ORDER BY a.starts_at, a.id"
        ))
        .bind::<Nullable<SqlUuid>, _>(filter.client_id.map(|id| *id.as_uuid()))
        .bind::<Nullable<SqlUuid>, _>(filter.barber_id.map(|id| *id.as_uuid()))
        .bind::<Nullable<Timestamptz>, _>(filter.from)
        .bind::<Nullable<Timestamptz>, _>(filter.to)
        .load(&mut conn)
        .await?;
        rows.into_iter()
            .map(AppointmentDetailsRow::into_domain)
            .collect()
    }

    async fn busy_intervals(
        &self,
        barber_id: &UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows = appointments::table
            .filter(appointments::barber_id.eq(barber_id.as_uuid()))
            .filter(appointments::status.eq_any(statuses(&AppointmentStatus::ACTIVE)))
            .filter(appointments::starts_at.lt(to))
            .filter(appointments::ends_at.gt(from))
            .order(appointments::starts_at.asc())
            .select((appointments::starts_at, appointments::ends_at))
            .load(&mut conn)
            .await?;
        Ok(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<AppointmentRow> = diesel::update(
            appointments::table
                .filter(appointments::id.eq(id))
                .filter(appointments::status.eq(expected.as_str())),
        )
        .set((
            appointments::status.eq(status.as_str()),
            appointments::updated_at.eq(at),
        ))
        .returning(AppointmentRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;
        Ok(row.map(AppointmentRow::into_domain).transpose()?)
    }

    async fn delete_finished_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await?;
        let deleted = diesel::delete(
            appointments::table
                .filter(appointments::status.eq_any(statuses(&AppointmentStatus::TERMINAL)))
                .filter(appointments::ends_at.lt(cutoff)),
        )
        .execute(&mut conn)
        .await?;
        Ok(rows_u64(deleted))
    }
}
