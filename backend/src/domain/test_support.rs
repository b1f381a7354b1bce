//! Shared builders for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::{
    Appointment, AppointmentDetails, AppointmentStatus, DisplayName, Email, Principal, Role,
    ServiceOffering, User, UserId,
};

/// 2026-03-02 08:00 UTC, a Monday.
pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    clock_at(fixture_now())
}

pub(crate) fn clock_at(utc_now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now })
}

pub(crate) fn principal(role: Role) -> Principal {
    Principal::new(UserId::random(), role)
}

pub(crate) fn user(id: UserId, name: &str, role: Role) -> User {
    User {
        id,
        email: Email::new(format!("{}@example.com", name.to_lowercase())).expect("fixture email"),
        display_name: DisplayName::new(name).expect("fixture display name"),
        role,
        phone: None,
        image_url: None,
        created_at: fixture_now(),
    }
}

pub(crate) fn service(barber_id: UserId, duration_minutes: u32, price_cents: i64) -> ServiceOffering {
    ServiceOffering {
        id: Uuid::new_v4(),
        barber_id,
        name: "Skin fade".into(),
        description: None,
        price_cents,
        duration_minutes,
        created_at: fixture_now(),
    }
}

pub(crate) fn appointment(
    client_id: UserId,
    barber_id: UserId,
    starts_at: DateTime<Utc>,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        client_id,
        barber_id,
        service_id: Uuid::new_v4(),
        starts_at,
        ends_at: starts_at + Duration::minutes(30),
        status,
        notes: None,
        created_at: fixture_now(),
        updated_at: fixture_now(),
    }
}

pub(crate) fn details(appointment: Appointment) -> AppointmentDetails {
    AppointmentDetails {
        appointment,
        client_name: "Ada".into(),
        barber_name: "Jo".into(),
        service_name: "Skin fade".into(),
        price_cents: 3000,
    }
}
