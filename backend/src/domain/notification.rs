//! Web push subscriptions and the notifications sent through them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::domain::UserId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionValidationError {
    #[error("endpoint must be an https URL")]
    InvalidEndpoint,
    #[error("{field} must not be empty")]
    MissingKey { field: &'static str },
}

/// A browser push subscription registered by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub id: Uuid,
    pub user_id: UserId,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub created_at: DateTime<Utc>,
}

/// Validated subscription input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionDraft {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

impl SubscriptionDraft {
    pub fn try_new(endpoint: &str, p256dh: &str, auth: &str) -> Result<Self, SubscriptionValidationError> {
        let endpoint = parse_endpoint(endpoint)?;
        let p256dh = p256dh.trim();
        if p256dh.is_empty() {
            return Err(SubscriptionValidationError::MissingKey { field: "p256dh" });
        }
        let auth = auth.trim();
        if auth.is_empty() {
            return Err(SubscriptionValidationError::MissingKey { field: "auth" });
        }
        Ok(Self {
            endpoint,
            p256dh: p256dh.to_owned(),
            auth: auth.to_owned(),
        })
    }
}

/// Validate a push endpoint: an absolute https URL with a host.
pub fn parse_endpoint(raw: &str) -> Result<String, SubscriptionValidationError> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| url.scheme() == "https" && url.host_str().is_some())
        .map(String::from)
        .ok_or(SubscriptionValidationError::InvalidEndpoint)
}

/// Payload delivered to a push endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub url: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sent to a provider when a client books.
    pub fn new_booking(client_name: &str, service_name: &str, starts_at: DateTime<Utc>, appointment_id: Uuid) -> Self {
        Self::new(
            "New booking",
            format!(
                "{client_name} booked {service_name} on {}",
                starts_at.format("%a %d %b %H:%M UTC")
            ),
        )
        .with_url(format!("/appointments/{appointment_id}"))
    }

    /// Sent to the other participant when an appointment is cancelled.
    pub fn cancelled(cancelled_by: &str, starts_at: DateTime<Utc>, appointment_id: Uuid) -> Self {
        Self::new(
            "Appointment cancelled",
            format!(
                "{cancelled_by} cancelled the appointment on {}",
                starts_at.format("%a %d %b %H:%M UTC")
            ),
        )
        .with_url(format!("/appointments/{appointment_id}"))
    }

    /// Sent to a client when the provider confirms.
    pub fn confirmed(barber_name: &str, starts_at: DateTime<Utc>, appointment_id: Uuid) -> Self {
        Self::new(
            "Appointment confirmed",
            format!(
                "{barber_name} confirmed your appointment on {}",
                starts_at.format("%a %d %b %H:%M UTC")
            ),
        )
        .with_url(format!("/appointments/{appointment_id}"))
    }

    /// Sent to the recipient of a direct message.
    pub fn new_message(sender_name: &str, sender_id: UserId) -> Self {
        Self::new("New message", format!("{sender_name} sent you a message"))
            .with_url(format!("/conversations/{sender_id}"))
    }

    /// Admin-triggered test notification.
    pub fn test() -> Self {
        Self::new("Test notification", "Push notifications are working.")
    }
}

/// Result of a single push attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    /// The endpoint no longer exists; the subscription should be removed.
    Gone,
}

/// Per-user dispatch tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub delivered: usize,
    pub removed: usize,
    pub failed: usize,
}
