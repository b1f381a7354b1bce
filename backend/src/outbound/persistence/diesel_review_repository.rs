//! PostgreSQL-backed `ReviewRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{NewReview, Review, UserId};

use super::error_mapping::{Violation, impl_persistence_error_from, violation};
use super::models::ReviewRow;
use super::pool::DbPool;
use super::schema::{reviews, users};

impl_persistence_error_from!(ReviewPersistenceError);

/// Diesel implementation of [`ReviewRepository`].
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_reviews(rows: Vec<(ReviewRow, String)>) -> Result<Vec<Review>, ReviewPersistenceError> {
    rows.into_iter()
        .map(|(row, name)| row.into_domain(name).map_err(Into::into))
        .collect()
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn create(&self, review: &NewReview) -> Result<Review, ReviewPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row = ReviewRow {
            id: Uuid::new_v4(),
            appointment_id: review.appointment_id,
            barber_id: *review.barber_id.as_uuid(),
            client_id: *review.client_id.as_uuid(),
            rating: i16::from(review.rating.get()),
            comment: review.comment.clone(),
            response: Some(review.response.clone()),
            responded_at: None,
            created_at: review.created_at,
        };
        let stored: ReviewRow = diesel::insert_into(reviews::table)
            .values(&row)
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match violation(&err) {
                Some(Violation::Unique) => {
                    ReviewPersistenceError::duplicate("appointment is already reviewed")
                }
                _ => err.into(),
            })?;
        let client_name: String = users::table
            .find(stored.client_id)
            .select(users::display_name)
            .first(&mut conn)
            .await?;
        Ok(stored.into_domain(client_name)?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<(ReviewRow, String)> = reviews::table
            .inner_join(users::table)
            .filter(reviews::id.eq(id))
            .select((ReviewRow::as_select(), users::display_name))
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row
            .map(|(row, name)| row.into_domain(name))
            .transpose()?)
    }

    async fn list_for_barber(&self, barber_id: &UserId) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<(ReviewRow, String)> = reviews::table
            .inner_join(users::table)
            .filter(reviews::barber_id.eq(barber_id.as_uuid()))
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .select((ReviewRow::as_select(), users::display_name))
            .load(&mut conn)
            .await?;
        to_reviews(rows)
    }

    async fn set_response(
        &self,
        id: Uuid,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await?;
        let updated: Option<ReviewRow> = diesel::update(reviews::table.find(id))
            .set((reviews::response.eq(response), reviews::responded_at.eq(at)))
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        let Some(row) = updated else {
            return Ok(None);
        };
        let client_name: String = users::table
            .find(row.client_id)
            .select(users::display_name)
            .first(&mut conn)
            .await?;
        Ok(Some(row.into_domain(client_name)?))
    }
}
