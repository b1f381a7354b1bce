//! PostgreSQL-backed `GalleryRepository`. Only metadata lives here; the
//! image bytes are in the media store under `storage_key`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{GalleryPersistenceError, GalleryRepository};
use crate::domain::{GalleryImage, UserId};

use super::error_mapping::impl_persistence_error_from;
use super::models::GalleryImageRow;
use super::pool::DbPool;
use super::schema::gallery_images;

impl_persistence_error_from!(GalleryPersistenceError);

/// Diesel implementation of [`GalleryRepository`].
#[derive(Clone)]
pub struct DieselGalleryRepository {
    pool: DbPool,
}

impl DieselGalleryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryRepository for DieselGalleryRepository {
    async fn create(&self, image: &GalleryImage) -> Result<GalleryImage, GalleryPersistenceError> {
        let mut conn = self.pool.get().await?;
        let stored: GalleryImageRow = diesel::insert_into(gallery_images::table)
            .values(&GalleryImageRow::from(image))
            .returning(GalleryImageRow::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored.into())
    }

    async fn list(&self, barber_id: &UserId) -> Result<Vec<GalleryImage>, GalleryPersistenceError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<GalleryImageRow> = gallery_images::table
            .filter(gallery_images::barber_id.eq(barber_id.as_uuid()))
            .order((gallery_images::created_at.desc(), gallery_images::id.desc()))
            .select(GalleryImageRow::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows.into_iter().map(GalleryImage::from).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<GalleryImage>, GalleryPersistenceError> {
        let mut conn = self.pool.get().await?;
        let row: Option<GalleryImageRow> = gallery_images::table
            .find(id)
            .select(GalleryImageRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(GalleryImage::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, GalleryPersistenceError> {
        let mut conn = self.pool.get().await?;
        let deleted = diesel::delete(gallery_images::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}
