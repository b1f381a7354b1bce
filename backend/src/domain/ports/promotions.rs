//! Driving port for promotions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Error, Principal, Promotion, PromotionDraft, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Promotions: Send + Sync {
    /// Providers create promotions for themselves; ADMIN creates shop-wide
    /// ones. The draft's `barber_id` is set from the caller.
    async fn create(&self, caller: &Principal, draft: PromotionDraft) -> Result<Promotion, Error>;

    async fn list_active(&self, barber_id: Option<UserId>) -> Result<Vec<Promotion>, Error>;

    async fn deactivate(&self, caller: &Principal, id: Uuid) -> Result<Promotion, Error>;

    /// Highest live percentage applying to `barber_id` at `at`.
    async fn best_discount_for(&self, barber_id: UserId, at: DateTime<Utc>) -> Result<Option<u8>, Error>;
}
