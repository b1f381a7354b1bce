//! Port for review persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{NewReview, Review, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The appointment was already reviewed.
        Duplicate { message: String } => "review already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &NewReview) -> Result<Review, ReviewPersistenceError>;

    async fn find(&self, id: Uuid) -> Result<Option<Review>, ReviewPersistenceError>;

    /// Newest first.
    async fn list_for_barber(&self, barber_id: &UserId) -> Result<Vec<Review>, ReviewPersistenceError>;

    async fn set_response(
        &self,
        id: Uuid,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Review>, ReviewPersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReviewRepository;

#[async_trait]
impl ReviewRepository for FixtureReviewRepository {
    async fn create(&self, _review: &NewReview) -> Result<Review, ReviewPersistenceError> {
        Err(ReviewPersistenceError::connection("no database configured"))
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(None)
    }

    async fn list_for_barber(&self, _barber_id: &UserId) -> Result<Vec<Review>, ReviewPersistenceError> {
        Ok(Vec::new())
    }

    async fn set_response(
        &self,
        _id: Uuid,
        _response: &str,
        _at: DateTime<Utc>,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(None)
    }
}
