//! Time-bounded percentage discounts.
//!
//! A promotion with no `barber_id` is shop-wide and applies to every
//! provider. Promotions never stack: the single highest applicable
//! percentage wins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum promotion title length, in characters.
pub const TITLE_MAX: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromotionValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("discount must be between 1 and 100 percent, got {value}")]
    DiscountOutOfRange { value: i64 },
    #[error("promotion must start before it ends")]
    EmptyPeriod,
}

/// A discount offered for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: Uuid,
    pub barber_id: Option<UserId>,
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: u8,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Promotion {
    /// Active flag set and `starts_at <= at < ends_at`.
    pub fn is_live_at(&self, at: DateTime<Utc>) -> bool {
        self.active && self.starts_at <= at && at < self.ends_at
    }

    /// Shop-wide promotions apply to everyone.
    pub fn applies_to(&self, barber_id: &UserId) -> bool {
        self.barber_id.as_ref().is_none_or(|owner| owner == barber_id)
    }
}

/// Validated input for a new promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionDraft {
    pub barber_id: Option<UserId>,
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: u8,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl PromotionDraft {
    pub fn try_new(
        barber_id: Option<UserId>,
        title: &str,
        description: Option<&str>,
        discount_percent: i64,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, PromotionValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PromotionValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(PromotionValidationError::TitleTooLong { max: TITLE_MAX });
        }
        let discount_percent = u8::try_from(discount_percent)
            .ok()
            .filter(|value| (1..=100).contains(value))
            .ok_or(PromotionValidationError::DiscountOutOfRange {
                value: discount_percent,
            })?;
        if starts_at >= ends_at {
            return Err(PromotionValidationError::EmptyPeriod);
        }
        Ok(Self {
            barber_id,
            title: title.to_owned(),
            description: description
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
            discount_percent,
            starts_at,
            ends_at,
        })
    }
}

/// Highest percentage among promotions live at `at` that apply to `barber_id`.
pub fn best_discount(promotions: &[Promotion], barber_id: &UserId, at: DateTime<Utc>) -> Option<u8> {
    promotions
        .iter()
        .filter(|promotion| promotion.is_live_at(at) && promotion.applies_to(barber_id))
        .map(|promotion| promotion.discount_percent)
        .max()
}

/// Discount amount in cents, rounded down and never above `subtotal_cents`.
///
/// # Examples
/// ```
/// use barberbook::domain::promotion::discount_amount;
///
/// assert_eq!(discount_amount(2999, 15), 449);
/// assert_eq!(discount_amount(2000, 100), 2000);
/// ```
pub fn discount_amount(subtotal_cents: i64, percent: u8) -> i64 {
    if subtotal_cents <= 0 {
        return 0;
    }
    let amount = subtotal_cents.saturating_mul(i64::from(percent)) / 100;
    amount.min(subtotal_cents)
}
