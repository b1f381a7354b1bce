//! Provider gallery uploads backed by the media store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::gallery::storage_key;
use crate::domain::ports::{Gallery, GalleryRepository, MediaStore};
use crate::domain::repository_errors::{map_gallery_error, map_media_error};
use crate::domain::{Error, GalleryImage, ImageUpload, Principal, UserId};

/// Gallery service implementing the [`Gallery`] driving port.
#[derive(Clone)]
pub struct GalleryService<G, M> {
    images: Arc<G>,
    media: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<G, M> GalleryService<G, M> {
    pub fn new(images: Arc<G>, media: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            images,
            media,
            clock,
        }
    }
}

#[async_trait]
impl<G, M> Gallery for GalleryService<G, M>
where
    G: GalleryRepository,
    M: MediaStore,
{
    async fn upload(&self, caller: &Principal, upload: ImageUpload) -> Result<GalleryImage, Error> {
        caller.require_provider()?;
        let id = Uuid::new_v4();
        let key = storage_key(&caller.user_id, id, upload.kind);
        let url = self
            .media
            .put(&key, upload.bytes, upload.kind.content_type())
            .await
            .map_err(map_media_error)?;

        let image = GalleryImage {
            id,
            barber_id: caller.user_id,
            storage_key: key,
            url,
            caption: upload.caption,
            created_at: self.clock.utc(),
        };
        match self.images.create(&image).await {
            Ok(stored) => {
                info!(image_id = %stored.id, barber_id = %caller.user_id, "gallery image uploaded");
                Ok(stored)
            }
            Err(error) => {
                if let Err(cleanup) = self.media.delete(&image.storage_key).await {
                    warn!(error = %cleanup, key = %image.storage_key, "orphaned media object");
                }
                Err(map_gallery_error(error))
            }
        }
    }

    async fn list(&self, barber_id: UserId) -> Result<Vec<GalleryImage>, Error> {
        self.images.list(&barber_id).await.map_err(map_gallery_error)
    }

    async fn delete(&self, caller: &Principal, id: Uuid) -> Result<(), Error> {
        let missing = || Error::not_found(format!("gallery image {id} not found"));
        let image = self
            .images
            .find(id)
            .await
            .map_err(map_gallery_error)?
            .ok_or_else(missing)?;
        caller.require_owner_or_admin(&image.barber_id)?;
        self.media
            .delete(&image.storage_key)
            .await
            .map_err(map_media_error)?;
        if self.images.delete(id).await.map_err(map_gallery_error)? {
            info!(image_id = %id, "gallery image deleted");
            Ok(())
        } else {
            Err(missing())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        GalleryPersistenceError, MediaStoreError, MockGalleryRepository, MockMediaStore,
    };
    use crate::domain::test_support::{fixture_clock, fixture_now, principal};
    use crate::domain::{ErrorCode, Role};
    use mockall::Sequence;
    use rstest::rstest;

    fn upload() -> ImageUpload {
        ImageUpload::try_new("image/png", vec![1, 2, 3], Some("Fade")).expect("upload")
    }

    #[rstest]
    #[tokio::test]
    async fn upload_stores_object_then_record() {
        let caller = principal(Role::Barber);
        let prefix = format!("gallery/{}/", caller.user_id);
        let mut media = MockMediaStore::new();
        media
            .expect_put()
            .withf(move |key, bytes, content_type| {
                key.starts_with(&prefix)
                    && key.ends_with(".png")
                    && bytes.len() == 3
                    && content_type == "image/png"
            })
            .return_once(|key, _, _| Ok(format!("https://media.example.com/{key}")));
        let mut images = MockGalleryRepository::new();
        images.expect_create().return_once(|image| Ok(image.clone()));

        let image = GalleryService::new(Arc::new(images), Arc::new(media), fixture_clock())
            .upload(&caller, upload())
            .await
            .expect("uploaded");
        assert!(image.url.ends_with(".png"));
        assert_eq!(image.caption.as_deref(), Some("Fade"));
        assert_eq!(image.created_at, fixture_now());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_record_removes_the_object() {
        let mut media = MockMediaStore::new();
        media
            .expect_put()
            .return_once(|_, _, _| Ok("https://media.example.com/x.png".into()));
        media.expect_delete().times(1).return_once(|_| Ok(()));
        let mut images = MockGalleryRepository::new();
        images
            .expect_create()
            .return_once(|_| Err(GalleryPersistenceError::connection("down")));

        let err = GalleryService::new(Arc::new(images), Arc::new(media), fixture_clock())
            .upload(&principal(Role::Stylist), upload())
            .await
            .expect_err("failed");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn clients_cannot_upload() {
        let err = GalleryService::new(
            Arc::new(MockGalleryRepository::new()),
            Arc::new(MockMediaStore::new()),
            fixture_clock(),
        )
        .upload(&principal(Role::Client), upload())
        .await
        .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_object_before_record() {
        let caller = principal(Role::Barber);
        let image = GalleryImage {
            id: Uuid::new_v4(),
            barber_id: caller.user_id,
            storage_key: "gallery/a/b.png".into(),
            url: "https://media.example.com/gallery/a/b.png".into(),
            caption: None,
            created_at: fixture_now(),
        };
        let mut seq = Sequence::new();
        let mut images = MockGalleryRepository::new();
        let mut media = MockMediaStore::new();
        images
            .expect_find()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_| Ok(Some(image)));
        media
            .expect_delete()
            .withf(|key| key == "gallery/a/b.png")
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(()));
        images
            .expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(true));

        GalleryService::new(Arc::new(images), Arc::new(media), fixture_clock())
            .delete(&caller, Uuid::new_v4())
            .await
            .expect("deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn media_failure_keeps_the_record() {
        let caller = principal(Role::Admin);
        let image = GalleryImage {
            id: Uuid::new_v4(),
            barber_id: UserId::random(),
            storage_key: "gallery/a/b.png".into(),
            url: "u".into(),
            caption: None,
            created_at: fixture_now(),
        };
        let mut images = MockGalleryRepository::new();
        images.expect_find().return_once(move |_| Ok(Some(image)));
        images.expect_delete().never();
        let mut media = MockMediaStore::new();
        media
            .expect_delete()
            .return_once(|_| Err(MediaStoreError::io("disk full")));

        let err = GalleryService::new(Arc::new(images), Arc::new(media), fixture_clock())
            .delete(&caller, Uuid::new_v4())
            .await
            .expect_err("media failure");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
