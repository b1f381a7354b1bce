//! Driving port for push subscriptions and notification dispatch.

use async_trait::async_trait;

use crate::domain::{
    DispatchReport, Error, Notification, Principal, PushSubscription, SubscriptionDraft, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifications: Send + Sync {
    async fn subscribe(&self, caller: &Principal, draft: SubscriptionDraft) -> Result<PushSubscription, Error>;

    async fn unsubscribe(&self, caller: &Principal, endpoint: String) -> Result<(), Error>;

    /// Single-pass delivery to every subscription of `user_id`. Failures are
    /// logged and counted, never returned.
    async fn notify_user(&self, user_id: UserId, notification: Notification) -> DispatchReport;

    /// ADMIN only.
    async fn send_test(&self, caller: &Principal, user_id: UserId) -> Result<DispatchReport, Error>;
}
