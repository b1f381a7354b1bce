//! Port for gallery image records.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{GalleryImage, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by gallery repository adapters.
    pub enum GalleryPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "gallery repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "gallery repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GalleryRepository: Send + Sync {
    async fn create(&self, image: &GalleryImage) -> Result<GalleryImage, GalleryPersistenceError>;

    /// Newest first.
    async fn list(&self, barber_id: &UserId) -> Result<Vec<GalleryImage>, GalleryPersistenceError>;

    async fn find(&self, id: Uuid) -> Result<Option<GalleryImage>, GalleryPersistenceError>;

    async fn delete(&self, id: Uuid) -> Result<bool, GalleryPersistenceError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGalleryRepository;

#[async_trait]
impl GalleryRepository for FixtureGalleryRepository {
    async fn create(&self, _image: &GalleryImage) -> Result<GalleryImage, GalleryPersistenceError> {
        Err(GalleryPersistenceError::connection("no database configured"))
    }

    async fn list(&self, _barber_id: &UserId) -> Result<Vec<GalleryImage>, GalleryPersistenceError> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: Uuid) -> Result<Option<GalleryImage>, GalleryPersistenceError> {
        Ok(None)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, GalleryPersistenceError> {
        Ok(false)
    }
}
