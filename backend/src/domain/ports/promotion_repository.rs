//! Port for promotion persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Promotion, PromotionDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by promotion repository adapters.
    pub enum PromotionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "promotion repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "promotion repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromotionRepository: Send + Sync {
    async fn create(&self, draft: &PromotionDraft) -> Result<Promotion, PromotionPersistenceError>;

    async fn find(&self, id: Uuid) -> Result<Option<Promotion>, PromotionPersistenceError>;

    /// Promotions live at `at`. With a barber, only that barber's and
    /// shop-wide promotions are returned.
    async fn list_live(
        &self,
        barber_id: Option<UserId>,
        at: DateTime<Utc>,
    ) -> Result<Vec<Promotion>, PromotionPersistenceError>;

    async fn deactivate(&self, id: Uuid) -> Result<Option<Promotion>, PromotionPersistenceError>;

    /// Clear the active flag on promotions whose `ends_at <= now`.
    async fn expire_ended(&self, now: DateTime<Utc>) -> Result<u64, PromotionPersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePromotionRepository;

#[async_trait]
impl PromotionRepository for FixturePromotionRepository {
    async fn create(&self, _draft: &PromotionDraft) -> Result<Promotion, PromotionPersistenceError> {
        Err(PromotionPersistenceError::connection("no database configured"))
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Promotion>, PromotionPersistenceError> {
        Ok(None)
    }

    async fn list_live(
        &self,
        _barber_id: Option<UserId>,
        _at: DateTime<Utc>,
    ) -> Result<Vec<Promotion>, PromotionPersistenceError> {
        Ok(Vec::new())
    }

    async fn deactivate(&self, _id: Uuid) -> Result<Option<Promotion>, PromotionPersistenceError> {
        Ok(None)
    }

    async fn expire_ended(&self, _now: DateTime<Utc>) -> Result<u64, PromotionPersistenceError> {
        Ok(0)
    }
}
