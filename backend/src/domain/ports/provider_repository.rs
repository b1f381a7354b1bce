//! Port for provider profiles, service menus, weekly availability and
//! social link clicks.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    AvailabilityWindow, Provider, ProviderProfile, ServiceDraft, ServiceOffering, SocialPlatform,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by provider repository adapters.
    pub enum ProviderPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "provider repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "provider repository query failed: {message}",
        /// A row is still referenced elsewhere (for example a booked service).
        InUse { message: String } => "provider record still in use: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// All BARBER and STYLIST users, by display name.
    async fn list_providers(&self) -> Result<Vec<Provider>, ProviderPersistenceError>;

    /// A single provider; `None` when the user is missing or not a provider.
    async fn find_provider(&self, id: &UserId) -> Result<Option<Provider>, ProviderPersistenceError>;

    async fn upsert_profile(
        &self,
        id: &UserId,
        profile: &ProviderProfile,
    ) -> Result<ProviderProfile, ProviderPersistenceError>;

    /// Service menu, cheapest first.
    async fn list_services(
        &self,
        barber_id: &UserId,
    ) -> Result<Vec<ServiceOffering>, ProviderPersistenceError>;

    async fn find_service(&self, id: Uuid) -> Result<Option<ServiceOffering>, ProviderPersistenceError>;

    async fn create_service(
        &self,
        barber_id: &UserId,
        draft: &ServiceDraft,
    ) -> Result<ServiceOffering, ProviderPersistenceError>;

    async fn update_service(
        &self,
        id: Uuid,
        draft: &ServiceDraft,
    ) -> Result<Option<ServiceOffering>, ProviderPersistenceError>;

    /// Returns whether a row was deleted.
    async fn delete_service(&self, id: Uuid) -> Result<bool, ProviderPersistenceError>;

    async fn availability(
        &self,
        barber_id: &UserId,
    ) -> Result<Vec<AvailabilityWindow>, ProviderPersistenceError>;

    /// Replace the whole weekly template atomically.
    async fn replace_availability(
        &self,
        barber_id: &UserId,
        windows: &[AvailabilityWindow],
    ) -> Result<(), ProviderPersistenceError>;

    async fn record_click(
        &self,
        barber_id: &UserId,
        platform: SocialPlatform,
        at: DateTime<Utc>,
    ) -> Result<(), ProviderPersistenceError>;

    /// Sparse per-platform click counts since `since` (all time when `None`).
    async fn click_counts(
        &self,
        barber_id: &UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<(SocialPlatform, u64)>, ProviderPersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProviderRepository;

fn unavailable() -> ProviderPersistenceError {
    ProviderPersistenceError::connection("no database configured")
}

#[async_trait]
impl ProviderRepository for FixtureProviderRepository {
    async fn list_providers(&self) -> Result<Vec<Provider>, ProviderPersistenceError> {
        Ok(Vec::new())
    }

    async fn find_provider(&self, _id: &UserId) -> Result<Option<Provider>, ProviderPersistenceError> {
        Ok(None)
    }

    async fn upsert_profile(
        &self,
        _id: &UserId,
        _profile: &ProviderProfile,
    ) -> Result<ProviderProfile, ProviderPersistenceError> {
        Err(unavailable())
    }

    async fn list_services(
        &self,
        _barber_id: &UserId,
    ) -> Result<Vec<ServiceOffering>, ProviderPersistenceError> {
        Ok(Vec::new())
    }

    async fn find_service(&self, _id: Uuid) -> Result<Option<ServiceOffering>, ProviderPersistenceError> {
        Ok(None)
    }

    async fn create_service(
        &self,
        _barber_id: &UserId,
        _draft: &ServiceDraft,
    ) -> Result<ServiceOffering, ProviderPersistenceError> {
        Err(unavailable())
    }

    async fn update_service(
        &self,
        _id: Uuid,
        _draft: &ServiceDraft,
    ) -> Result<Option<ServiceOffering>, ProviderPersistenceError> {
        Ok(None)
    }

    async fn delete_service(&self, _id: Uuid) -> Result<bool, ProviderPersistenceError> {
        Ok(false)
    }

    async fn availability(
        &self,
        _barber_id: &UserId,
    ) -> Result<Vec<AvailabilityWindow>, ProviderPersistenceError> {
        Ok(Vec::new())
    }

    async fn replace_availability(
        &self,
        _barber_id: &UserId,
        _windows: &[AvailabilityWindow],
    ) -> Result<(), ProviderPersistenceError> {
        Err(unavailable())
    }

    async fn record_click(
        &self,
        _barber_id: &UserId,
        _platform: SocialPlatform,
        _at: DateTime<Utc>,
    ) -> Result<(), ProviderPersistenceError> {
        Ok(())
    }

    async fn click_counts(
        &self,
        _barber_id: &UserId,
        _since: Option<DateTime<Utc>>,
    ) -> Result<Vec<(SocialPlatform, u64)>, ProviderPersistenceError> {
        Ok(Vec::new())
    }
}
