//! Single-pass retention sweeps.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AppointmentRepository, Maintenance, PromotionRepository, SocialRepository,
};
use crate::domain::repository_errors::{
    map_appointment_error, map_promotion_error, map_social_error,
};
use crate::domain::{Error, Principal, RetentionPolicy, SweepReport};

/// Maintenance service implementing the [`Maintenance`] driving port.
#[derive(Clone)]
pub struct MaintenanceService<A, S, P> {
    appointments: Arc<A>,
    social: Arc<S>,
    promotions: Arc<P>,
    policy: RetentionPolicy,
    clock: Arc<dyn Clock>,
}

impl<A, S, P> MaintenanceService<A, S, P> {
    pub fn new(
        appointments: Arc<A>,
        social: Arc<S>,
        promotions: Arc<P>,
        policy: RetentionPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            appointments,
            social,
            promotions,
            policy,
            clock,
        }
    }
}

impl<A, S, P> MaintenanceService<A, S, P>
where
    A: AppointmentRepository,
    S: SocialRepository,
    P: PromotionRepository,
{
    /// Run every sweep once as of `now`. Used by the sweep binary.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<SweepReport, Error> {
        let appointments_deleted = self
            .appointments
            .delete_finished_before(self.policy.appointment_cutoff(now))
            .await
            .map_err(map_appointment_error)?;
        let posts_deleted = self
            .social
            .delete_posts_before(self.policy.post_cutoff(now))
            .await
            .map_err(map_social_error)?;
        let promotions_expired = self
            .promotions
            .expire_ended(now)
            .await
            .map_err(map_promotion_error)?;

        let report = SweepReport {
            appointments_deleted,
            posts_deleted,
            promotions_expired,
        };
        info!(
            appointments_deleted,
            posts_deleted, promotions_expired, "maintenance sweep finished"
        );
        Ok(report)
    }
}

#[async_trait]
impl<A, S, P> Maintenance for MaintenanceService<A, S, P>
where
    A: AppointmentRepository,
    S: SocialRepository,
    P: PromotionRepository,
{
    async fn sweep(&self, caller: &Principal) -> Result<SweepReport, Error> {
        caller.require_admin()?;
        self.run(self.clock.utc()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockAppointmentRepository, MockPromotionRepository, MockSocialRepository,
    };
    use crate::domain::test_support::{fixture_clock, fixture_now, principal};
    use crate::domain::{ErrorCode, Role};
    use chrono::Duration;
    use rstest::rstest;

    type Service =
        MaintenanceService<MockAppointmentRepository, MockSocialRepository, MockPromotionRepository>;

    fn make(
        appointments: MockAppointmentRepository,
        social: MockSocialRepository,
        promotions: MockPromotionRepository,
        policy: RetentionPolicy,
    ) -> Service {
        MaintenanceService::new(
            Arc::new(appointments),
            Arc::new(social),
            Arc::new(promotions),
            policy,
            fixture_clock(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn sweep_applies_policy_cutoffs() {
        let policy = RetentionPolicy {
            appointment_days: 30,
            post_days: 10,
        };
        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_delete_finished_before()
            .withf(|cutoff| *cutoff == fixture_now() - Duration::days(30))
            .return_once(|_| Ok(3));
        let mut social = MockSocialRepository::new();
        social
            .expect_delete_posts_before()
            .withf(|cutoff| *cutoff == fixture_now() - Duration::days(10))
            .return_once(|_| Ok(2));
        let mut promotions = MockPromotionRepository::new();
        promotions
            .expect_expire_ended()
            .withf(|now| *now == fixture_now())
            .return_once(|_| Ok(1));

        let report = make(appointments, social, promotions, policy)
            .sweep(&principal(Role::Admin))
            .await
            .expect("swept");
        assert_eq!(
            report,
            SweepReport {
                appointments_deleted: 3,
                posts_deleted: 2,
                promotions_expired: 1,
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn sweep_is_admin_only() {
        let err = make(
            MockAppointmentRepository::new(),
            MockSocialRepository::new(),
            MockPromotionRepository::new(),
            RetentionPolicy::default(),
        )
        .sweep(&principal(Role::Barber))
        .await
        .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
