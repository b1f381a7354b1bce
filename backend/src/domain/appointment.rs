//! Appointments and their status lifecycle.
//!
//! ```text
//! PENDING ──► CONFIRMED ──► COMPLETED
//!    │            │
//!    ├────────────┴──► CANCELLED
//!    └────────────┴──► NO_SHOW
//! ```
//!
//! `COMPLETED`, `CANCELLED` and `NO_SHOW` are terminal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum length of booking notes, in characters.
pub const NOTES_MAX: usize = 500;

/// Errors raised by appointment rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentError {
    #[error("unknown appointment status '{value}'")]
    UnknownStatus { value: String },
    #[error("cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[error("notes must be at most {max} characters")]
    NotesTooLong { max: usize },
}

/// Appointment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
        Self::NoShow,
    ];

    /// Statuses that still hold a slot on the provider's calendar.
    pub const ACTIVE: [Self; 2] = [Self::Pending, Self::Confirmed];

    /// Statuses that no longer change.
    pub const TERMINAL: [Self; 3] = [Self::Completed, Self::Cancelled, Self::NoShow];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Whether the lifecycle allows moving to `next`.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
                | (Self::Pending | Self::Confirmed, Self::NoShow)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppointmentError::UnknownStatus {
                value: s.to_owned(),
            })
    }
}

/// A booked appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: UserId,
    pub barber_id: UserId,
    pub service_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Client and barber, in that order.
    pub fn participants(&self) -> [UserId; 2] {
        [self.client_id, self.barber_id]
    }

    /// Check a status change against the lifecycle.
    pub fn transition(&self, next: AppointmentStatus) -> Result<AppointmentStatus, AppointmentError> {
        if self.status.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppointmentError::InvalidTransition {
                from: self.status,
                to: next,
            })
        }
    }
}

/// Appointment joined with the names and price shown in listings and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub client_name: String,
    pub barber_name: String,
    pub service_name: String,
    pub price_cents: i64,
}

/// Validated booking input, before the service checks availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub client_id: UserId,
    pub barber_id: UserId,
    pub service_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Build a booking whose end is derived from the service duration.
    pub fn try_new(
        client_id: UserId,
        barber_id: UserId,
        service_id: Uuid,
        starts_at: DateTime<Utc>,
        duration_minutes: u32,
        notes: Option<&str>,
    ) -> Result<Self, AppointmentError> {
        let notes = normalise_notes(notes)?;
        Ok(Self {
            client_id,
            barber_id,
            service_id,
            starts_at,
            ends_at: starts_at + Duration::minutes(i64::from(duration_minutes)),
            notes,
        })
    }
}

fn normalise_notes(notes: Option<&str>) -> Result<Option<String>, AppointmentError> {
    let Some(trimmed) = notes.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > NOTES_MAX {
        return Err(AppointmentError::NotesTooLong { max: NOTES_MAX });
    }
    Ok(Some(trimmed.to_owned()))
}

/// Listing filter. `None` fields do not constrain the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub client_id: Option<UserId>,
    pub barber_id: Option<UserId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
