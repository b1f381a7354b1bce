//! Driving port for provider pages, service menus, availability and link
//! click tracking.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    AvailabilityWindow, ClickSummary, Error, Principal, Provider, ProviderDetail, ProviderProfile,
    ServiceDraft, ServiceOffering, ServicePatch, Slot, SocialPlatform, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Providers: Send + Sync {
    async fn list_providers(&self) -> Result<Vec<Provider>, Error>;

    async fn get_provider(&self, id: UserId) -> Result<ProviderDetail, Error>;

    /// The caller's own profile; provider roles only.
    async fn upsert_profile(
        &self,
        caller: &Principal,
        profile: ProviderProfile,
    ) -> Result<ProviderProfile, Error>;

    async fn create_service(
        &self,
        caller: &Principal,
        draft: ServiceDraft,
    ) -> Result<ServiceOffering, Error>;

    async fn update_service(
        &self,
        caller: &Principal,
        id: Uuid,
        patch: ServicePatch,
    ) -> Result<ServiceOffering, Error>;

    async fn delete_service(&self, caller: &Principal, id: Uuid) -> Result<(), Error>;

    /// Replace the caller's weekly template.
    async fn set_availability(
        &self,
        caller: &Principal,
        windows: Vec<AvailabilityWindow>,
    ) -> Result<Vec<AvailabilityWindow>, Error>;

    async fn open_slots(
        &self,
        barber_id: UserId,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Slot>, Error>;

    async fn record_click(&self, barber_id: UserId, platform: SocialPlatform) -> Result<(), Error>;

    async fn click_summary(
        &self,
        caller: &Principal,
        barber_id: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<ClickSummary, Error>;
}
