//! Post-appointment reviews and their templated auto-responses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum review comment or response length, in characters.
pub const REVIEW_TEXT_MAX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("rating must be between 1 and 5, got {value}")]
    RatingOutOfRange { value: i64 },
    #[error("text must not be empty")]
    EmptyText,
    #[error("text must be at most {max} characters")]
    TextTooLong { max: usize },
}

/// Star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (1..=5).contains(v))
            .map(Self)
            .ok_or(ReviewValidationError::RatingOutOfRange { value })
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Validate optional free text: trimmed, blank treated as absent.
pub fn review_text(raw: Option<&str>) -> Result<Option<String>, ReviewValidationError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(text) if text.chars().count() > REVIEW_TEXT_MAX => {
            Err(ReviewValidationError::TextTooLong {
                max: REVIEW_TEXT_MAX,
            })
        }
        Some(text) => Ok(Some(text.to_owned())),
    }
}

/// Validate a provider response, which must not be blank.
pub fn response_text(raw: &str) -> Result<String, ReviewValidationError> {
    review_text(Some(raw))?.ok_or(ReviewValidationError::EmptyText)
}

/// Templated reply attached when a review is created.
///
/// # Examples
/// ```
/// use barberbook::domain::{Rating, auto_response};
///
/// let reply = auto_response(Rating::new(5).unwrap(), "Ada");
/// assert!(reply.starts_with("Thank you, Ada!"));
/// ```
pub fn auto_response(rating: Rating, client_name: &str) -> String {
    match rating.get() {
        4..=5 => format!(
            "Thank you, {client_name}! We're thrilled you enjoyed your visit and can't wait to see you again."
        ),
        3 => format!(
            "Thanks for the feedback, {client_name}. We'd love to hear how we can make your next visit even better."
        ),
        _ => format!(
            "We're sorry, {client_name}. Your experience fell short of our standards; please reach out so we can make it right."
        ),
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub barber_id: UserId,
    pub client_id: UserId,
    pub client_name: String,
    pub rating: Rating,
    pub comment: Option<String>,
    pub response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A review ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub appointment_id: Uuid,
    pub barber_id: UserId,
    pub client_id: UserId,
    pub rating: Rating,
    pub comment: Option<String>,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// Reviews of one provider with the average rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub barber_id: UserId,
    pub average_rating: Option<f64>,
    pub review_count: usize,
    pub reviews: Vec<Review>,
}

impl ReviewSummary {
    /// Average rounded to two decimals; `None` when there are no reviews.
    pub fn from_reviews(barber_id: UserId, reviews: Vec<Review>) -> Self {
        let review_count = reviews.len();
        let average_rating = (review_count > 0).then(|| {
            let total: u32 = reviews.iter().map(|r| u32::from(r.rating.get())).sum();
            let average = f64::from(total) / review_count as f64;
            (average * 100.0).round() / 100.0
        });
        Self {
            barber_id,
            average_rating,
            review_count,
            reviews,
        }
    }
}
