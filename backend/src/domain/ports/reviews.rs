//! Driving port for reviews.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Principal, Rating, Review, ReviewSummary, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Reviews: Send + Sync {
    async fn create(
        &self,
        caller: &Principal,
        appointment_id: Uuid,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, Error>;

    async fn respond(&self, caller: &Principal, id: Uuid, response: String) -> Result<Review, Error>;

    async fn list_for_barber(&self, barber_id: UserId) -> Result<ReviewSummary, Error>;
}
