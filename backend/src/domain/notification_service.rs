//! Push subscription management and single-pass notification dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{Notifications, PushSender, PushSubscriptionRepository};
use crate::domain::repository_errors::map_subscription_error;
use crate::domain::{
    DispatchReport, Error, Notification, Principal, PushOutcome, PushSubscription,
    SubscriptionDraft, UserId,
};

/// Notification service implementing the [`Notifications`] driving port.
#[derive(Clone)]
pub struct NotificationService<S, P> {
    subscriptions: Arc<S>,
    sender: Arc<P>,
}

impl<S, P> NotificationService<S, P> {
    pub fn new(subscriptions: Arc<S>, sender: Arc<P>) -> Self {
        Self {
            subscriptions,
            sender,
        }
    }
}

impl<S, P> NotificationService<S, P>
where
    S: PushSubscriptionRepository,
    P: PushSender,
{
    async fn deliver(
        &self,
        subscription: &PushSubscription,
        notification: &Notification,
        report: &mut DispatchReport,
    ) {
        match self.sender.send(subscription, notification).await {
            Ok(PushOutcome::Delivered) => report.delivered += 1,
            Ok(PushOutcome::Gone) => {
                match self
                    .subscriptions
                    .delete_endpoint(&subscription.endpoint)
                    .await
                {
                    Ok(_) => report.removed += 1,
                    Err(error) => {
                        warn!(%error, subscription_id = %subscription.id, "failed to remove gone subscription");
                        report.failed += 1;
                    }
                }
            }
            Err(error) => {
                warn!(%error, subscription_id = %subscription.id, "push delivery failed");
                report.failed += 1;
            }
        }
    }
}

#[async_trait]
impl<S, P> Notifications for NotificationService<S, P>
where
    S: PushSubscriptionRepository,
    P: PushSender,
{
    async fn subscribe(
        &self,
        caller: &Principal,
        draft: SubscriptionDraft,
    ) -> Result<PushSubscription, Error> {
        let subscription = self
            .subscriptions
            .upsert(&caller.user_id, &draft)
            .await
            .map_err(map_subscription_error)?;
        info!(user_id = %caller.user_id, "push subscription registered");
        Ok(subscription)
    }

    async fn unsubscribe(&self, caller: &Principal, endpoint: String) -> Result<(), Error> {
        let removed = self
            .subscriptions
            .delete(&caller.user_id, &endpoint)
            .await
            .map_err(map_subscription_error)?;
        debug!(user_id = %caller.user_id, removed, "push subscription removed");
        Ok(())
    }

    async fn notify_user(&self, user_id: UserId, notification: Notification) -> DispatchReport {
        let mut report = DispatchReport::default();
        let subscriptions = match self.subscriptions.list_for_user(&user_id).await {
            Ok(subscriptions) => subscriptions,
            Err(error) => {
                warn!(%error, %user_id, "could not load push subscriptions");
                return report;
            }
        };
        for subscription in &subscriptions {
            self.deliver(subscription, &notification, &mut report).await;
        }
        debug!(
            %user_id,
            delivered = report.delivered,
            removed = report.removed,
            failed = report.failed,
            "notification dispatched"
        );
        report
    }

    async fn send_test(&self, caller: &Principal, user_id: UserId) -> Result<DispatchReport, Error> {
        caller.require_admin()?;
        Ok(self.notify_user(user_id, Notification::test()).await)
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
