//! Provider pages, service menus, weekly availability, open slots and
//! social link clicks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{AppointmentRepository, ProviderRepository, Providers};
use crate::domain::repository_errors::{map_appointment_error, map_provider_error};
use crate::domain::schedule::{open_slots, validate_weekly_template};
use crate::domain::{
    AvailabilityWindow, ClickSummary, Error, Principal, Provider, ProviderDetail, ProviderProfile,
    ServiceDraft, ServiceOffering, ServicePatch, Slot, SocialPlatform, TimeOfDay, UserId,
};

/// Provider service implementing the [`Providers`] driving port.
#[derive(Clone)]
pub struct ProviderService<P, A> {
    providers: Arc<P>,
    appointments: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<P, A> ProviderService<P, A> {
    pub fn new(providers: Arc<P>, appointments: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            providers,
            appointments,
            clock,
        }
    }
}

impl<P, A> ProviderService<P, A>
where
    P: ProviderRepository,
    A: AppointmentRepository,
{
    async fn provider(&self, id: &UserId) -> Result<Provider, Error> {
        self.providers
            .find_provider(id)
            .await
            .map_err(map_provider_error)?
            .ok_or_else(|| Error::not_found(format!("provider {id} not found")))
    }

    async fn owned_service(&self, caller: &Principal, id: Uuid) -> Result<ServiceOffering, Error> {
        let service = self
            .providers
            .find_service(id)
            .await
            .map_err(map_provider_error)?
            .ok_or_else(|| Error::not_found(format!("service {id} not found")))?;
        caller.require_owner_or_admin(&service.barber_id)?;
        Ok(service)
    }
}

#[async_trait]
impl<P, A> Providers for ProviderService<P, A>
where
    P: ProviderRepository,
    A: AppointmentRepository,
{
    async fn list_providers(&self) -> Result<Vec<Provider>, Error> {
        self.providers.list_providers().await.map_err(map_provider_error)
    }

    async fn get_provider(&self, id: UserId) -> Result<ProviderDetail, Error> {
        let provider = self.provider(&id).await?;
        let services = self
            .providers
            .list_services(&id)
            .await
            .map_err(map_provider_error)?;
        let availability = self
            .providers
            .availability(&id)
            .await
            .map_err(map_provider_error)?;
        Ok(ProviderDetail {
            provider,
            services,
            availability,
        })
    }

    async fn upsert_profile(
        &self,
        caller: &Principal,
        profile: ProviderProfile,
    ) -> Result<ProviderProfile, Error> {
        caller.require_provider()?;
        self.providers
            .upsert_profile(&caller.user_id, &profile)
            .await
            .map_err(map_provider_error)
    }

    async fn create_service(
        &self,
        caller: &Principal,
        draft: ServiceDraft,
    ) -> Result<ServiceOffering, Error> {
        caller.require_provider()?;
        let service = self
            .providers
            .create_service(&caller.user_id, &draft)
            .await
            .map_err(map_provider_error)?;
        info!(barber_id = %caller.user_id, service_id = %service.id, "service created");
        Ok(service)
    }

    async fn update_service(
        &self,
        caller: &Principal,
        id: Uuid,
        patch: ServicePatch,
    ) -> Result<ServiceOffering, Error> {
        let current = self.owned_service(caller, id).await?;
        let draft = patch
            .apply(&current)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.providers
            .update_service(id, &draft)
            .await
            .map_err(map_provider_error)?
            .ok_or_else(|| Error::not_found(format!("service {id} not found")))
    }

    async fn delete_service(&self, caller: &Principal, id: Uuid) -> Result<(), Error> {
        self.owned_service(caller, id).await?;
        if self
            .providers
            .delete_service(id)
            .await
            .map_err(map_provider_error)?
        {
            Ok(())
        } else {
            Err(Error::not_found(format!("service {id} not found")))
        }
    }

    async fn set_availability(
        &self,
        caller: &Principal,
        windows: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, Error> {
        caller.require_provider()?;
        let template =
            validate_weekly_template(windows).map_err(|err| Error::invalid_request(err.to_string()))?;
        self.providers
            .replace_availability(&caller.user_id, &template)
            .await
            .map_err(map_provider_error)?;
        info!(barber_id = %caller.user_id, days = template.len(), "availability replaced");
        Ok(template)
    }

    async fn open_slots(
        &self,
        barber_id: UserId,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Slot>, Error> {
        let service = self
            .providers
            .find_service(service_id)
            .await
            .map_err(map_provider_error)?
            .filter(|service| service.barber_id == barber_id)
            .ok_or_else(|| Error::not_found(format!("service {service_id} not offered by {barber_id}")))?;
        let template = self
            .providers
            .availability(&barber_id)
            .await
            .map_err(map_provider_error)?;

        let day_start = TimeOfDay::MIDNIGHT.on(date);
        let busy = self
            .appointments
            .busy_intervals(&barber_id, day_start, day_start + Duration::days(1))
            .await
            .map_err(map_appointment_error)?;
        Ok(open_slots(
            &template,
            date,
            service.duration_minutes,
            &busy,
            self.clock.utc(),
        ))
    }

    async fn record_click(&self, barber_id: UserId, platform: SocialPlatform) -> Result<(), Error> {
        self.provider(&barber_id).await?;
        self.providers
            .record_click(&barber_id, platform, self.clock.utc())
            .await
            .map_err(map_provider_error)
    }

    async fn click_summary(
        &self,
        caller: &Principal,
        barber_id: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<ClickSummary, Error> {
        caller.require_owner_or_admin(&barber_id)?;
        let counts = self
            .providers
            .click_counts(&barber_id, since)
            .await
            .map_err(map_provider_error)?;
        Ok(ClickSummary::from_counts(&counts))
    }
}

#[cfg(test)]
#[path = "provider_service_tests.rs"]
mod tests;
