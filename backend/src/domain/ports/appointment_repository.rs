//! Port for appointment persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Appointment, AppointmentDetails, AppointmentFilter, AppointmentStatus, NewAppointment, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by appointment repository adapters.
    pub enum AppointmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "appointment repository query failed: {message}",
        /// The requested interval overlaps an active appointment.
        Overlap => "appointment overlaps an existing booking",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a booking unless it overlaps one of the barber's active
    /// appointments. The check and the insert share one transaction.
    async fn create_if_free(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentPersistenceError>;

    async fn find(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentPersistenceError>;

    async fn find_details(
        &self,
        id: Uuid,
    ) -> Result<Option<AppointmentDetails>, AppointmentPersistenceError>;

    /// Appointments matching `filter`, by start time.
    async fn list_details(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentDetails>, AppointmentPersistenceError>;

    /// Intervals of the barber's active appointments intersecting `[from, to)`.
    async fn busy_intervals(
        &self,
        barber_id: &UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, AppointmentPersistenceError>;

    /// Move to `status` only if the stored status is still `expected`.
    /// `None` when the row is missing or changed concurrently.
    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError>;

    /// Delete terminal appointments that ended before `cutoff`.
    async fn delete_finished_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AppointmentPersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAppointmentRepository;

#[async_trait]
impl AppointmentRepository for FixtureAppointmentRepository {
    async fn create_if_free(
        &self,
        _appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentPersistenceError> {
        Err(AppointmentPersistenceError::connection("no database configured"))
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        Ok(None)
    }

    async fn find_details(
        &self,
        _id: Uuid,
    ) -> Result<Option<AppointmentDetails>, AppointmentPersistenceError> {
        Ok(None)
    }

    async fn list_details(
        &self,
        _filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentDetails>, AppointmentPersistenceError> {
        Ok(Vec::new())
    }

    async fn busy_intervals(
        &self,
        _barber_id: &UserId,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, AppointmentPersistenceError> {
        Ok(Vec::new())
    }

    async fn update_status(
        &self,
        _id: Uuid,
        _expected: AppointmentStatus,
        _status: AppointmentStatus,
        _at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        Ok(None)
    }

    async fn delete_finished_before(
        &self,
        _cutoff: DateTime<Utc>,
    ) -> Result<u64, AppointmentPersistenceError> {
        Ok(0)
    }
}
