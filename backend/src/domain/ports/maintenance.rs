//! Driving port for retention sweeps.

use async_trait::async_trait;

use crate::domain::{Error, Principal, SweepReport};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Maintenance: Send + Sync {
    /// ADMIN-triggered sweep.
    async fn sweep(&self, caller: &Principal) -> Result<SweepReport, Error>;
}
