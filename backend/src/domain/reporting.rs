//! Admin summary report types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::formatting::format_price;
use crate::domain::{AppointmentStatus, Role, UserId};

/// Number of providers listed in [`SummaryReport::top_providers`].
pub const TOP_PROVIDERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCount {
    pub role: Role,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: AppointmentStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRanking {
    pub barber_id: UserId,
    pub display_name: String,
    pub completed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    pub cents: i64,
    pub formatted: FormattedPrice,
}

impl Revenue {
    pub fn from_cents(cents: i64) -> Self {
        Self {
            cents,
            formatted: FormattedPrice(cents),
        }
    }
}

/// Serialises integer cents through [`format_price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattedPrice(i64);

impl Serialize for FormattedPrice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_price(self.0))
    }
}

/// Aggregates over `[from, to)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub users_by_role: Vec<RoleCount>,
    pub appointments_by_status: Vec<StatusCount>,
    pub revenue: Revenue,
    pub new_posts: u64,
    pub top_providers: Vec<ProviderRanking>,
}

/// Expand sparse role counts so every role appears, in a fixed order.
pub fn complete_role_counts(counts: &[(Role, u64)]) -> Vec<RoleCount> {
    [Role::Admin, Role::Barber, Role::Stylist, Role::Client]
        .into_iter()
        .map(|role| RoleCount {
            role,
            count: counts
                .iter()
                .filter(|(r, _)| *r == role)
                .map(|(_, n)| *n)
                .sum(),
        })
        .collect()
}

/// Expand sparse status counts so every status appears, in lifecycle order.
pub fn complete_status_counts(counts: &[(AppointmentStatus, u64)]) -> Vec<StatusCount> {
    AppointmentStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: counts
                .iter()
                .filter(|(s, _)| *s == status)
                .map(|(_, n)| *n)
                .sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn role_counts_cover_every_role() {
        let counts = complete_role_counts(&[(Role::Client, 7)]);
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[3], RoleCount { role: Role::Client, count: 7 });
        assert_eq!(counts[0].count, 0);
    }

    #[rstest]
    fn status_counts_follow_lifecycle_order() {
        let counts = complete_status_counts(&[(AppointmentStatus::NoShow, 2)]);
        let statuses: Vec<_> = counts.iter().map(|c| c.status).collect();
        assert_eq!(statuses, AppointmentStatus::ALL.to_vec());
        assert_eq!(counts[4].count, 2);
    }

    #[rstest]
    fn revenue_serialises_formatted_amount() {
        let value = serde_json::to_value(Revenue::from_cents(123_450)).expect("serialise");
        assert_eq!(value, serde_json::json!({"cents": 123_450, "formatted": "$1234.50"}));
    }
}
