//! Reviews of completed appointments.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{AppointmentRepository, ReviewRepository, Reviews};
use crate::domain::repository_errors::{map_appointment_error, map_review_error};
use crate::domain::review::{auto_response, response_text, review_text};
use crate::domain::{
    AppointmentStatus, Error, NewReview, Principal, Rating, Review, ReviewSummary, UserId,
};

/// Review service implementing the [`Reviews`] driving port.
#[derive(Clone)]
pub struct ReviewService<R, A> {
    reviews: Arc<R>,
    appointments: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<R, A> ReviewService<R, A> {
    pub fn new(reviews: Arc<R>, appointments: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reviews,
            appointments,
            clock,
        }
    }
}

#[async_trait]
impl<R, A> Reviews for ReviewService<R, A>
where
    R: ReviewRepository,
    A: AppointmentRepository,
{
    async fn create(
        &self,
        caller: &Principal,
        appointment_id: Uuid,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Review, Error> {
        let comment =
            review_text(comment.as_deref()).map_err(|err| Error::invalid_request(err.to_string()))?;
        let details = self
            .appointments
            .find_details(appointment_id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| Error::not_found(format!("appointment {appointment_id} not found")))?;
        let appointment = &details.appointment;
        if appointment.client_id != caller.user_id {
            return Err(Error::forbidden("only the appointment's client can review it"));
        }
        if appointment.status != AppointmentStatus::Completed {
            return Err(Error::invalid_request(
                "only completed appointments can be reviewed",
            ));
        }

        let review = self
            .reviews
            .create(&NewReview {
                appointment_id,
                barber_id: appointment.barber_id,
                client_id: appointment.client_id,
                rating,
                comment,
                response: auto_response(rating, &details.client_name),
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_review_error)?;
        info!(review_id = %review.id, %appointment_id, rating = rating.get(), "review created");
        Ok(review)
    }

    async fn respond(&self, caller: &Principal, id: Uuid, response: String) -> Result<Review, Error> {
        let response =
            response_text(&response).map_err(|err| Error::invalid_request(err.to_string()))?;
        let missing = || Error::not_found(format!("review {id} not found"));
        let review = self
            .reviews
            .find(id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(missing)?;
        caller.require_owner_or_admin(&review.barber_id)?;
        self.reviews
            .set_response(id, &response, self.clock.utc())
            .await
            .map_err(map_review_error)?
            .ok_or_else(missing)
    }

    async fn list_for_barber(&self, barber_id: UserId) -> Result<ReviewSummary, Error> {
        let reviews = self
            .reviews
            .list_for_barber(&barber_id)
            .await
            .map_err(map_review_error)?;
        Ok(ReviewSummary::from_reviews(barber_id, reviews))
    }
}
