//! Promotion management and discount lookup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{PromotionRepository, Promotions};
use crate::domain::promotion::best_discount;
use crate::domain::repository_errors::map_promotion_error;
use crate::domain::{Error, Principal, Promotion, PromotionDraft, UserId};

/// Promotion service implementing the [`Promotions`] driving port.
#[derive(Clone)]
pub struct PromotionService<R> {
    promotions: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> PromotionService<R> {
    pub fn new(promotions: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { promotions, clock }
    }
}

#[async_trait]
impl<R> Promotions for PromotionService<R>
where
    R: PromotionRepository,
{
    async fn create(&self, caller: &Principal, mut draft: PromotionDraft) -> Result<Promotion, Error> {
        if caller.is_provider() {
            draft.barber_id = Some(caller.user_id);
        } else {
            // Admins may target one provider or the whole shop.
            caller.require_admin()?;
        }
        let promotion = self
            .promotions
            .create(&draft)
            .await
            .map_err(map_promotion_error)?;
        info!(
            promotion_id = %promotion.id,
            shop_wide = promotion.barber_id.is_none(),
            discount = promotion.discount_percent,
            "promotion created"
        );
        Ok(promotion)
    }

    async fn list_active(&self, barber_id: Option<UserId>) -> Result<Vec<Promotion>, Error> {
        self.promotions
            .list_live(barber_id, self.clock.utc())
            .await
            .map_err(map_promotion_error)
    }

    async fn deactivate(&self, caller: &Principal, id: Uuid) -> Result<Promotion, Error> {
        let missing = || Error::not_found(format!("promotion {id} not found"));
        let promotion = self
            .promotions
            .find(id)
            .await
            .map_err(map_promotion_error)?
            .ok_or_else(missing)?;
        match promotion.barber_id {
            Some(owner) => caller.require_owner_or_admin(&owner)?,
            None => caller.require_admin()?,
        }
        self.promotions
            .deactivate(id)
            .await
            .map_err(map_promotion_error)?
            .ok_or_else(missing)
    }

    async fn best_discount_for(
        &self,
        barber_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<u8>, Error> {
        let live = self
            .promotions
            .list_live(Some(barber_id), at)
            .await
            .map_err(map_promotion_error)?;
        Ok(best_discount(&live, &barber_id, at))
    }
}
