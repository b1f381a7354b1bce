//! Driving port for admin reporting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, Principal, SummaryReport};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Reports: Send + Sync {
    async fn summary(
        &self,
        caller: &Principal,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<SummaryReport, Error>;
}
