//! Driving port for provider galleries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, GalleryImage, ImageUpload, Principal, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gallery: Send + Sync {
    async fn upload(&self, caller: &Principal, upload: ImageUpload) -> Result<GalleryImage, Error>;

    async fn list(&self, barber_id: UserId) -> Result<Vec<GalleryImage>, Error>;

    async fn delete(&self, caller: &Principal, id: Uuid) -> Result<(), Error>;
}
