//! Retention policy for the periodic cleanup sweep.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default retention for finished appointments.
pub const DEFAULT_APPOINTMENT_RETENTION_DAYS: u32 = 90;
/// Default retention for feed posts.
pub const DEFAULT_POST_RETENTION_DAYS: u32 = 365;

/// How long records are kept before a sweep removes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicy {
    pub appointment_days: u32,
    pub post_days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            appointment_days: DEFAULT_APPOINTMENT_RETENTION_DAYS,
            post_days: DEFAULT_POST_RETENTION_DAYS,
        }
    }
}

/// `now` minus `days`, clamped to the earliest representable instant.
fn days_before(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl RetentionPolicy {
    /// Terminal appointments ending before this instant are removed.
    pub fn appointment_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        days_before(now, self.appointment_days)
    }

    /// Posts created before this instant are removed.
    pub fn post_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        days_before(now, self.post_days)
    }
}

/// Rows affected by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub appointments_deleted: u64,
    pub posts_deleted: u64,
    pub promotions_expired: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn cutoffs_subtract_whole_days() {
        let now = DateTime::<Utc>::UNIX_EPOCH + Duration::days(400);
        let policy = RetentionPolicy::default();
        assert_eq!(
            policy.appointment_cutoff(now),
            DateTime::<Utc>::UNIX_EPOCH + Duration::days(310)
        );
        assert_eq!(
            policy.post_cutoff(now),
            DateTime::<Utc>::UNIX_EPOCH + Duration::days(35)
        );
    }

    #[rstest]
    fn oversized_retention_keeps_everything() {
        let now = DateTime::<Utc>::UNIX_EPOCH + Duration::days(400);
        let policy = RetentionPolicy {
            appointment_days: u32::MAX,
            post_days: u32::MAX,
        };

        assert_eq!(policy.appointment_cutoff(now), DateTime::<Utc>::MIN_UTC);
        assert_eq!(policy.post_cutoff(now), DateTime::<Utc>::MIN_UTC);
    }
}
