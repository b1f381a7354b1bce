//! Driving port for appointment booking, lifecycle and exports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Appointment, AppointmentDetails, Error, Principal, UserId};

/// Booking input as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Only honoured for ADMIN callers booking on behalf of a client.
    pub client_id: Option<UserId>,
    pub barber_id: UserId,
    pub service_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Optional `[from, to)` bounds on appointment start times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Bookings: Send + Sync {
    async fn book(&self, caller: &Principal, request: BookingRequest) -> Result<Appointment, Error>;

    async fn confirm(&self, caller: &Principal, id: Uuid) -> Result<Appointment, Error>;

    async fn complete(&self, caller: &Principal, id: Uuid) -> Result<Appointment, Error>;

    async fn cancel(&self, caller: &Principal, id: Uuid) -> Result<Appointment, Error>;

    async fn mark_no_show(&self, caller: &Principal, id: Uuid) -> Result<Appointment, Error>;

    /// Clients see their own, providers see theirs, ADMIN sees all.
    async fn list_mine(
        &self,
        caller: &Principal,
        range: DateRange,
    ) -> Result<Vec<AppointmentDetails>, Error>;

    async fn get(&self, caller: &Principal, id: Uuid) -> Result<AppointmentDetails, Error>;

    /// CSV export; ADMIN gets everything, providers their own.
    async fn export_csv(&self, caller: &Principal, range: DateRange) -> Result<String, Error>;

    async fn appointment_ics(&self, caller: &Principal, id: Uuid) -> Result<String, Error>;

    /// Upcoming active appointments of one provider as a calendar feed.
    async fn provider_calendar_ics(
        &self,
        caller: &Principal,
        barber_id: UserId,
    ) -> Result<String, Error>;
}
