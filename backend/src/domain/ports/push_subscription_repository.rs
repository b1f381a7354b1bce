//! Port for web push subscriptions.
use async_trait::async_trait;

use crate::domain::{PushSubscription, SubscriptionDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by push subscription adapters.
    pub enum PushSubscriptionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "push subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "push subscription repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSubscriptionRepository: Send + Sync {
    /// Insert, or re-point an existing endpoint at `user_id` with new keys.
    async fn upsert(
        &self,
        user_id: &UserId,
        draft: &SubscriptionDraft,
    ) -> Result<PushSubscription, PushSubscriptionPersistenceError>;

    /// Remove the caller's subscription for `endpoint`.
    async fn delete(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> Result<bool, PushSubscriptionPersistenceError>;

    /// Remove a subscription regardless of owner, used when the push
    /// service reports the endpoint gone.
    async fn delete_endpoint(&self, endpoint: &str) -> Result<bool, PushSubscriptionPersistenceError>;

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PushSubscription>, PushSubscriptionPersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePushSubscriptionRepository;

#[async_trait]
impl PushSubscriptionRepository for FixturePushSubscriptionRepository {
    async fn upsert(
        &self,
        _user_id: &UserId,
        _draft: &SubscriptionDraft,
    ) -> Result<PushSubscription, PushSubscriptionPersistenceError> {
        Err(PushSubscriptionPersistenceError::connection(
            "no database configured",
        ))
    }

    async fn delete(
        &self,
        _user_id: &UserId,
        _endpoint: &str,
    ) -> Result<bool, PushSubscriptionPersistenceError> {
        Ok(false)
    }

    async fn delete_endpoint(&self, _endpoint: &str) -> Result<bool, PushSubscriptionPersistenceError> {
        Ok(false)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<PushSubscription>, PushSubscriptionPersistenceError> {
        Ok(Vec::new())
    }
}
