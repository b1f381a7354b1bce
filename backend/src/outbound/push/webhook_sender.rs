//! Reqwest-backed `PushSender` posting JSON to each subscription endpoint.
//!
//! The adapter owns transport only: request shape, timeout and status
//! mapping. 404 and 410 mean the endpoint is gone for good.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::dto::PushPayloadDto;
use crate::domain::ports::{PushSendError, PushSender};
use crate::domain::{Notification, PushOutcome, PushSubscription};

const DEFAULT_USER_AGENT: &str = "barberbook-push/0.1";
/// Seconds a relay may hold an undelivered message.
const DEFAULT_TTL_SECONDS: u32 = 86_400;

/// Outbound identity for push requests.
pub struct WebhookIdentity {
    pub user_agent: String,
    pub ttl_seconds: u32,
}

impl Default for WebhookIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

/// Push sender that POSTs one JSON document per subscription.
#[derive(Clone)]
pub struct WebhookPushSender {
    client: Client,
    ttl_seconds: u32,
}

impl WebhookPushSender {
    /// Build a sender whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(timeout, WebhookIdentity::default())
    }

    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(timeout: Duration, identity: WebhookIdentity) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(identity.user_agent)
            .build()?;
        Ok(Self {
            client,
            ttl_seconds: identity.ttl_seconds,
        })
    }
}

#[async_trait]
impl PushSender for WebhookPushSender {
    async fn send(
        &self,
        subscription: &PushSubscription,
        notification: &Notification,
    ) -> Result<PushOutcome, PushSendError> {
        let response = self
            .client
            .post(&subscription.endpoint)
            .header("TTL", self.ttl_seconds.to_string())
            .json(&PushPayloadDto::new(subscription, notification))
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        debug!(status = status.as_u16(), subscription_id = %subscription.id, "push endpoint answered");
        map_status(status)
    }
}

fn map_transport_error(error: reqwest::Error) -> PushSendError {
    if error.is_timeout() {
        PushSendError::transport(format!("timed out: {error}"))
    } else {
        PushSendError::transport(error.to_string())
    }
}

fn map_status(status: StatusCode) -> Result<PushOutcome, PushSendError> {
    match status {
        _ if status.is_success() => Ok(PushOutcome::Delivered),
        StatusCode::NOT_FOUND | StatusCode::GONE => Ok(PushOutcome::Gone),
        _ => Err(PushSendError::rejected(status.as_u16())),
    }
}
