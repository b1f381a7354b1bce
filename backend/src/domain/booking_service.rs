//! Appointment booking, lifecycle transitions and calendar exports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::export::{appointments_csv, appointments_ics};
use crate::domain::ports::{
    AppointmentRepository, BookingRequest, Bookings, DateRange, Notifications, ProviderRepository,
};
use crate::domain::repository_errors::{map_appointment_error, map_provider_error};
use crate::domain::{
    Appointment, AppointmentDetails, AppointmentFilter, AppointmentStatus, DayOfWeek, Error,
    NewAppointment, Notification, Principal, Role, UserId,
};

/// Booking service implementing the [`Bookings`] driving port.
#[derive(Clone)]
pub struct BookingService<P, A> {
    providers: Arc<P>,
    appointments: Arc<A>,
    notifier: Arc<dyn Notifications>,
    clock: Arc<dyn Clock>,
}

impl<P, A> BookingService<P, A> {
    pub fn new(
        providers: Arc<P>,
        appointments: Arc<A>,
        notifier: Arc<dyn Notifications>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            appointments,
            notifier,
            clock,
        }
    }
}

fn not_found(id: Uuid) -> Error {
    Error::not_found(format!("appointment {id} not found"))
}

/// Listing filter for the caller's own appointments.
fn scoped_filter(caller: &Principal, range: DateRange) -> AppointmentFilter {
    let mut filter = AppointmentFilter {
        from: range.from,
        to: range.to,
        ..AppointmentFilter::default()
    };
    match caller.role {
        Role::Admin => {}
        Role::Barber | Role::Stylist => filter.barber_id = Some(caller.user_id),
        Role::Client => filter.client_id = Some(caller.user_id),
    }
    filter
}

impl<P, A> BookingService<P, A>
where
    P: ProviderRepository,
    A: AppointmentRepository,
{
    async fn load(&self, id: Uuid) -> Result<Appointment, Error> {
        self.appointments
            .find(id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn load_details(&self, id: Uuid) -> Result<AppointmentDetails, Error> {
        self.appointments
            .find_details(id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Resolve which client a booking is made for.
    fn booking_client(caller: &Principal, request: &BookingRequest) -> Result<UserId, Error> {
        match caller.role {
            Role::Client => match request.client_id {
                Some(other) if other != caller.user_id => {
                    Err(Error::forbidden("clients may only book for themselves"))
                }
                _ => Ok(caller.user_id),
            },
            Role::Admin => request.client_id.ok_or_else(|| {
                Error::invalid_request("clientId is required when booking on behalf of a client")
            }),
            Role::Barber | Role::Stylist => {
                Err(Error::forbidden("only clients can book appointments"))
            }
        }
    }

    async fn apply_status(
        &self,
        current: &Appointment,
        next: AppointmentStatus,
    ) -> Result<Appointment, Error> {
        let next = current
            .transition(next)
            .map_err(|err| Error::conflict(err.to_string()))?;
        let updated = self
            .appointments
            .update_status(current.id, current.status, next, self.clock.utc())
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| Error::conflict("appointment was modified concurrently"))?;
        info!(
            appointment_id = %updated.id,
            from = %current.status,
            to = %updated.status,
            "appointment status changed"
        );
        Ok(updated)
    }

    /// Send follow-up notifications for an appointment. Never fails.
    async fn notify<F>(&self, id: Uuid, build: F)
    where
        F: FnOnce(&AppointmentDetails) -> Vec<(UserId, Notification)> + Send,
    {
        let details = match self.appointments.find_details(id).await {
            Ok(Some(details)) => details,
            Ok(None) => return,
            Err(error) => {
                warn!(%error, appointment_id = %id, "skipping notification");
                return;
            }
        };
        for (user_id, notification) in build(&details) {
            let report = self.notifier.notify_user(user_id, notification).await;
            debug!(appointment_id = %id, %user_id, delivered = report.delivered, "participant notified");
        }
    }

    async fn active_range(&self, filter: AppointmentFilter) -> Result<Vec<AppointmentDetails>, Error> {
        let rows = self
            .appointments
            .list_details(&filter)
            .await
            .map_err(map_appointment_error)?;
        Ok(rows
            .into_iter()
            .filter(|row| row.appointment.status.is_active())
            .collect())
    }
}

#[async_trait]
impl<P, A> Bookings for BookingService<P, A>
where
    P: ProviderRepository,
    A: AppointmentRepository,
{
    async fn book(&self, caller: &Principal, request: BookingRequest) -> Result<Appointment, Error> {
        let client_id = Self::booking_client(caller, &request)?;
        if request.starts_at <= self.clock.utc() {
            return Err(Error::invalid_request("appointments must start in the future"));
        }

        let service = self
            .providers
            .find_service(request.service_id)
            .await
            .map_err(map_provider_error)?
            .filter(|service| service.barber_id == request.barber_id)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "service {} not offered by {}",
                    request.service_id, request.barber_id
                ))
            })?;

        let booking = NewAppointment::try_new(
            client_id,
            request.barber_id,
            service.id,
            request.starts_at,
            service.duration_minutes,
            request.notes.as_deref(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let weekday = DayOfWeek::of_date(booking.starts_at.date_naive());
        let template = self
            .providers
            .availability(&request.barber_id)
            .await
            .map_err(map_provider_error)?;
        let fits = template
            .iter()
            .filter(|window| window.day_of_week() == weekday)
            .any(|window| window.contains(booking.starts_at, booking.ends_at));
        if !fits {
            return Err(Error::invalid_request(
                "requested time is outside the barber's availability",
            ));
        }

        let created = self
            .appointments
            .create_if_free(&booking)
            .await
            .map_err(map_appointment_error)?;
        info!(
            appointment_id = %created.id,
            barber_id = %created.barber_id,
            client_id = %created.client_id,
            "appointment booked"
        );

        self.notify(created.id, |details| {
            vec![(
                details.appointment.barber_id,
                Notification::new_booking(
                    &details.client_name,
                    &details.service_name,
                    details.appointment.starts_at,
                    details.appointment.id,
                ),
            )]
        })
        .await;
        Ok(created)
    }

    async fn confirm(&self, caller: &Principal, id: Uuid) -> Result<Appointment, Error> {
        let current = self.load(id).await?;
        caller.require_owner_or_admin(&current.barber_id)?;
        let updated = self.apply_status(&current, AppointmentStatus::Confirmed).await?;
        self.notify(id, |details| {
            vec![(
                details.appointment.client_id,
                Notification::confirmed(
                    &details.barber_name,
                    details.appointment.starts_at,
                    details.appointment.id,
                ),
            )]
        })
        .await;
        Ok(updated)
    }

    async fn complete(&self, caller: &Principal, id: Uuid) -> Result<Appointment, Error> {
        let current = self.load(id).await?;
        caller.require_owner_or_admin(&current.barber_id)?;
        self.apply_status(&current, AppointmentStatus::Completed).await
    }

    async fn cancel(&self, caller: &Principal, id: Uuid) -> Result<Appointment, Error> {
        let current = self.load(id).await?;
        caller.require_participant_or_admin(&current.participants())?;
        let updated = self.apply_status(&current, AppointmentStatus::Cancelled).await?;

        let by = caller.user_id;
        self.notify(id, move |details| {
            let cancelled_by = if by == details.appointment.client_id {
                details.client_name.as_str()
            } else if by == details.appointment.barber_id {
                details.barber_name.as_str()
            } else {
                "The shop"
            };
            details
                .appointment
                .participants()
                .into_iter()
                .filter(|participant| *participant != by)
                .map(|participant| {
                    (
                        participant,
                        Notification::cancelled(
                            cancelled_by,
                            details.appointment.starts_at,
                            details.appointment.id,
                        ),
                    )
                })
                .collect()
        })
        .await;
        Ok(updated)
    }

    async fn mark_no_show(&self, caller: &Principal, id: Uuid) -> Result<Appointment, Error> {
        let current = self.load(id).await?;
        caller.require_owner_or_admin(&current.barber_id)?;
        if self.clock.utc() < current.starts_at {
            return Err(Error::invalid_request(
                "an appointment can only be marked as a no-show after it starts",
            ));
        }
        self.apply_status(&current, AppointmentStatus::NoShow).await
    }

    async fn list_mine(
        &self,
        caller: &Principal,
        range: DateRange,
    ) -> Result<Vec<AppointmentDetails>, Error> {
        self.appointments
            .list_details(&scoped_filter(caller, range))
            .await
            .map_err(map_appointment_error)
    }

    async fn get(&self, caller: &Principal, id: Uuid) -> Result<AppointmentDetails, Error> {
        let details = self.load_details(id).await?;
        caller.require_participant_or_admin(&details.appointment.participants())?;
        Ok(details)
    }

    async fn export_csv(&self, caller: &Principal, range: DateRange) -> Result<String, Error> {
        caller.require_provider_or_admin()?;
        let rows = self
            .appointments
            .list_details(&scoped_filter(caller, range))
            .await
            .map_err(map_appointment_error)?;
        debug!(user_id = %caller.user_id, rows = rows.len(), "appointments exported");
        Ok(appointments_csv(&rows))
    }

    async fn appointment_ics(&self, caller: &Principal, id: Uuid) -> Result<String, Error> {
        let details = self.get(caller, id).await?;
        Ok(appointments_ics(&[details], self.clock.utc()))
    }

    async fn provider_calendar_ics(
        &self,
        caller: &Principal,
        barber_id: UserId,
    ) -> Result<String, Error> {
        caller.require_owner_or_admin(&barber_id)?;
        let now: DateTime<Utc> = self.clock.utc();
        let rows = self
            .active_range(AppointmentFilter {
                barber_id: Some(barber_id),
                from: Some(now),
                ..AppointmentFilter::default()
            })
            .await?;
        Ok(appointments_ics(&rows, now))
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
