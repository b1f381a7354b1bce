//! Provider (barber or stylist) profiles and their service menus.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::formatting::{FormattingError, normalize_optional_url};
use crate::domain::{AvailabilityWindow, DisplayName, Role, UserId};

/// Maximum length of a provider bio, in characters.
pub const BIO_MAX: usize = 1000;
/// Maximum length of a service name, in characters.
pub const SERVICE_NAME_MAX: usize = 100;
/// Maximum length of a service description, in characters.
pub const SERVICE_DESCRIPTION_MAX: usize = 500;
/// Shortest bookable service.
pub const SERVICE_DURATION_MIN: u32 = 5;
/// Longest bookable service.
pub const SERVICE_DURATION_MAX: u32 = 480;

/// Errors raised while validating provider profile and service input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderValidationError {
    #[error("bio must be at most {max} characters")]
    BioTooLong { max: usize },
    #[error("{field}: {source}")]
    Link {
        field: &'static str,
        #[source]
        source: FormattingError,
    },
    #[error("service name must not be empty")]
    EmptyServiceName,
    #[error("service name must be at most {max} characters")]
    ServiceNameTooLong { max: usize },
    #[error("service description must be at most {max} characters")]
    ServiceDescriptionTooLong { max: usize },
    #[error("price must not be negative")]
    NegativePrice,
    #[error("duration must be between {min} and {max} minutes")]
    DurationOutOfRange { min: u32, max: u32 },
}

/// Social links and bio shown on a provider's public page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    pub bio: String,
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website_url: Option<String>,
}

impl ProviderProfile {
    /// Validate the bio and normalise each link.
    ///
    /// # Examples
    /// ```
    /// use barberbook::domain::ProviderProfile;
    ///
    /// let profile = ProviderProfile::try_new("Fades", Some("instagram.com/jo"), None, None, Some(""))
    ///     .unwrap();
    /// assert_eq!(profile.instagram_url.as_deref(), Some("https://instagram.com/jo"));
    /// assert_eq!(profile.website_url, None);
    /// ```
    pub fn try_new(
        bio: &str,
        instagram_url: Option<&str>,
        tiktok_url: Option<&str>,
        facebook_url: Option<&str>,
        website_url: Option<&str>,
    ) -> Result<Self, ProviderValidationError> {
        let bio = bio.trim();
        if bio.chars().count() > BIO_MAX {
            return Err(ProviderValidationError::BioTooLong { max: BIO_MAX });
        }
        let link = |field: &'static str, raw: Option<&str>| {
            normalize_optional_url(raw)
                .map_err(|source| ProviderValidationError::Link { field, source })
        };
        Ok(Self {
            bio: bio.to_owned(),
            instagram_url: link("instagramUrl", instagram_url)?,
            tiktok_url: link("tiktokUrl", tiktok_url)?,
            facebook_url: link("facebookUrl", facebook_url)?,
            website_url: link("websiteUrl", website_url)?,
        })
    }
}

/// A bookable provider as listed publicly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: UserId,
    pub display_name: DisplayName,
    pub role: Role,
    pub image_url: Option<String>,
    pub profile: Option<ProviderProfile>,
}

/// Full provider page: profile, menu and weekly availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDetail {
    #[serde(flatten)]
    pub provider: Provider,
    pub services: Vec<ServiceOffering>,
    pub availability: Vec<AvailabilityWindow>,
}

/// A service on a provider's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: Uuid,
    pub barber_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_minutes: u32,
    pub created_at: DateTime<Utc>,
}

/// Validated service fields for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    name: String,
    description: Option<String>,
    price_cents: i64,
    duration_minutes: u32,
}

impl ServiceDraft {
    pub fn try_new(
        name: &str,
        description: Option<&str>,
        price_cents: i64,
        duration_minutes: u32,
    ) -> Result<Self, ProviderValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProviderValidationError::EmptyServiceName);
        }
        if name.chars().count() > SERVICE_NAME_MAX {
            return Err(ProviderValidationError::ServiceNameTooLong {
                max: SERVICE_NAME_MAX,
            });
        }
        let description = description
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        if description
            .as_ref()
            .is_some_and(|value| value.chars().count() > SERVICE_DESCRIPTION_MAX)
        {
            return Err(ProviderValidationError::ServiceDescriptionTooLong {
                max: SERVICE_DESCRIPTION_MAX,
            });
        }
        if price_cents < 0 {
            return Err(ProviderValidationError::NegativePrice);
        }
        if !(SERVICE_DURATION_MIN..=SERVICE_DURATION_MAX).contains(&duration_minutes) {
            return Err(ProviderValidationError::DurationOutOfRange {
                min: SERVICE_DURATION_MIN,
                max: SERVICE_DURATION_MAX,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            description,
            price_cents,
            duration_minutes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub const fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

/// Partial update of a service; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub duration_minutes: Option<u32>,
}

impl ServicePatch {
    /// Merge onto an existing offering and re-validate the result.
    pub fn apply(&self, current: &ServiceOffering) -> Result<ServiceDraft, ProviderValidationError> {
        ServiceDraft::try_new(
            self.name.as_deref().unwrap_or(&current.name),
            self.description
                .as_deref()
                .or(current.description.as_deref()),
            self.price_cents.unwrap_or(current.price_cents),
            self.duration_minutes.unwrap_or(current.duration_minutes),
        )
    }
}
