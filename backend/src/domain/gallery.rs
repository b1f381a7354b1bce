//! Provider gallery images.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::UserId;

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// Maximum caption length, in characters.
pub const CAPTION_MAX: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadValidationError {
    #[error("unsupported content type '{value}'; expected image/jpeg, image/png or image/webp")]
    UnsupportedType { value: String },
    #[error("image is empty")]
    Empty,
    #[error("image exceeds {max} bytes")]
    TooLarge { max: usize },
    #[error("caption must be at most {max} characters")]
    CaptionTooLong { max: usize },
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Parse a `Content-Type` value, ignoring parameters.
    pub fn from_content_type(value: &str) -> Result<Self, UploadValidationError> {
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::Webp),
            _ => Err(UploadValidationError::UnsupportedType {
                value: value.to_owned(),
            }),
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

/// A validated upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
    pub caption: Option<String>,
}

impl ImageUpload {
    pub fn try_new(
        content_type: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<Self, UploadValidationError> {
        let kind = ImageKind::from_content_type(content_type)?;
        if bytes.is_empty() {
            return Err(UploadValidationError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadValidationError::TooLarge {
                max: MAX_IMAGE_BYTES,
            });
        }
        let caption = caption
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        if caption
            .as_ref()
            .is_some_and(|value| value.chars().count() > CAPTION_MAX)
        {
            return Err(UploadValidationError::CaptionTooLong { max: CAPTION_MAX });
        }
        Ok(Self {
            kind,
            bytes,
            caption,
        })
    }
}

/// Object key for a gallery image: `gallery/<barber>/<id>.<ext>`.
pub fn storage_key(barber_id: &UserId, image_id: Uuid, kind: ImageKind) -> String {
    format!("gallery/{barber_id}/{image_id}.{}", kind.extension())
}

/// A stored gallery image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: Uuid,
    pub barber_id: UserId,
    #[serde(skip)]
    pub storage_key: String,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("image/png", ImageKind::Png)]
    #[case("IMAGE/JPEG; charset=binary", ImageKind::Jpeg)]
    #[case("image/webp", ImageKind::Webp)]
    fn accepts_supported_types(#[case] raw: &str, #[case] expected: ImageKind) {
        assert_eq!(ImageKind::from_content_type(raw), Ok(expected));
    }

    #[rstest]
    #[case("image/gif")]
    #[case("application/octet-stream")]
    fn rejects_other_types(#[case] raw: &str) {
        assert!(matches!(
            ImageKind::from_content_type(raw),
            Err(UploadValidationError::UnsupportedType { .. })
        ));
    }

    #[rstest]
    fn rejects_oversized_upload() {
        let bytes = vec![0_u8; MAX_IMAGE_BYTES + 1];
        assert_eq!(
            ImageUpload::try_new("image/png", bytes, None),
            Err(UploadValidationError::TooLarge {
                max: MAX_IMAGE_BYTES
            })
        );
    }

    #[rstest]
    fn rejects_empty_upload() {
        assert_eq!(
            ImageUpload::try_new("image/png", Vec::new(), None),
            Err(UploadValidationError::Empty)
        );
    }

    #[rstest]
    fn storage_key_layout() {
        let barber = UserId::from_uuid(Uuid::nil());
        assert_eq!(
            storage_key(&barber, Uuid::nil(), ImageKind::Webp),
            "gallery/00000000-0000-0000-0000-000000000000/00000000-0000-0000-0000-000000000000.webp"
        );
    }
}
