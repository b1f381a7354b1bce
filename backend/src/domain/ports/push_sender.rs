//! Port for delivering notifications to push endpoints.
use async_trait::async_trait;

use crate::domain::{Notification, PushOutcome, PushSubscription};

use super::define_port_error;

define_port_error! {
    /// Errors raised by push delivery adapters.
    pub enum PushSendError {
        /// The endpoint could not be reached in time.
        Transport { message: String } => "push transport failed: {message}",
        /// The endpoint answered with an unexpected status.
        Rejected { status: u16 } => "push endpoint rejected the message with status {status}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Deliver one notification. A `Gone` outcome means the endpoint no
    /// longer exists.
    async fn send(
        &self,
        subscription: &PushSubscription,
        notification: &Notification,
    ) -> Result<PushOutcome, PushSendError>;
}
