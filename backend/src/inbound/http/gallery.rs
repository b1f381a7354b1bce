//! Provider gallery handlers.
//!
//! ```text
//! POST   /api/v1/gallery?caption=        (raw image body)
//! GET    /api/v1/providers/{id}/gallery
//! DELETE /api/v1/gallery/{id}
//! ```

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use futures_util::StreamExt;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::gallery::MAX_IMAGE_BYTES;
use crate::domain::{Error, ImageUpload, UploadValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, GalleryImageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_user_id, parse_uuid, require,
};

const BODY: FieldName = FieldName::new("body");
const CONTENT_TYPE_FIELD: FieldName = FieldName::new("contentType");

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Optional caption, at most 300 characters.
    pub caption: Option<String>,
}

/// Buffer the request body, failing as soon as it passes `limit` bytes.
async fn read_limited(mut payload: web::Payload, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| Error::invalid_request(format!("unreadable body: {err}")))?;
        if bytes.len() + chunk.len() > limit {
            return Err(invalid_field_error(
                BODY,
                UploadValidationError::TooLarge { max: limit },
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn map_upload_error(err: UploadValidationError) -> Error {
    let field = match err {
        UploadValidationError::UnsupportedType { .. } => CONTENT_TYPE_FIELD,
        UploadValidationError::Empty | UploadValidationError::TooLarge { .. } => BODY,
        UploadValidationError::CaptionTooLong { .. } => FieldName::new("caption"),
    };
    invalid_field_error(field, err)
}

/// Upload an image to the caller's gallery.
///
/// The body is the raw image; `Content-Type` must be `image/jpeg`,
/// `image/png` or `image/webp`. At most 5 MiB.
#[utoipa::path(
    post,
    path = "/api/v1/gallery",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "image/*", description = "Raw image bytes"),
    responses(
        (status = 201, description = "Image stored", body = GalleryImageSchema),
        (status = 400, description = "Unsupported, empty or oversized image", body = ErrorSchema),
        (status = 403, description = "Provider role required", body = ErrorSchema),
        (status = 503, description = "Media store unavailable", body = ErrorSchema)
    ),
    tags = ["gallery"],
    operation_id = "uploadImage"
)]
#[post("/gallery")]
pub async fn upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    query: web::Query<UploadQuery>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    caller.require_provider()?;
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let content_type = require(content_type, CONTENT_TYPE_FIELD)?;
    let bytes = read_limited(payload, MAX_IMAGE_BYTES).await?;
    let draft = ImageUpload::try_new(&content_type, bytes, query.caption.as_deref())
        .map_err(map_upload_error)?;
    let image = state.gallery.upload(&caller, draft).await?;
    Ok(HttpResponse::Created().json(image))
}

/// A provider's gallery, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}/gallery",
    params(("id" = String, Path, description = "Provider user id")),
    responses((status = 200, description = "Gallery images", body = [GalleryImageSchema])),
    tags = ["gallery"],
    operation_id = "listGallery",
    security([])
)]
#[get("/providers/{id}/gallery")]
pub async fn list_gallery(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let barber_id = parse_user_id(&path, FieldName::new("id"))?;
    let images = state.gallery.list(barber_id).await?;
    Ok(HttpResponse::Ok().json(images))
}

/// Remove an image and its stored object. Owner or admin.
#[utoipa::path(
    delete,
    path = "/api/v1/gallery/{id}",
    params(("id" = String, Path, description = "Image id")),
    responses(
        (status = 204, description = "Image removed"),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown image", body = ErrorSchema)
    ),
    tags = ["gallery"],
    operation_id = "deleteImage"
)]
#[delete("/gallery/{id}")]
pub async fn delete_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let id = parse_uuid(&path, FieldName::new("id"))?;
    state.gallery.delete(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::MockGallery;
    use crate::domain::test_support::{fixture_now, principal};
    use crate::domain::{GalleryImage, ImageKind, Role};
    use crate::inbound::http::test_utils::{login_request, mock_state, session_cookie, test_app};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/api/v1")
                .service(upload)
                .service(list_gallery)
                .service(delete_image),
        );
    }

    #[actix_web::test]
    async fn upload_passes_bytes_kind_and_caption() {
        let mut gallery = MockGallery::new();
        gallery
            .expect_upload()
            .withf(|_, draft| {
                draft.kind == ImageKind::Png
                    && draft.bytes == b"\x89PNG fake"
                    && draft.caption.as_deref() == Some("Low taper")
            })
            .times(1)
            .returning(|caller, draft| {
                let id = Uuid::new_v4();
                Ok(GalleryImage {
                    id,
                    barber_id: caller.user_id,
                    storage_key: format!("gallery/{}/{id}.png", caller.user_id),
                    url: format!("https://media.example.com/gallery/{}/{id}.png", caller.user_id),
                    caption: draft.caption,
                    created_at: fixture_now(),
                })
            });
        let state = HttpState {
            gallery: Arc::new(gallery),
            ..mock_state()
        };
        let app = test::init_service(test_app(state).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/gallery?caption=Low%20taper")
                .cookie(session_cookie(&login))
                .insert_header((CONTENT_TYPE, "image/png"))
                .set_payload(&b"\x89PNG fake"[..])
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        assert!(body.get("storageKey").is_none());
        assert!(body["url"].as_str().is_some_and(|url| url.ends_with(".png")));
    }

    #[rstest]
    #[case("image/gif", vec![1_u8; 16], "contentType")]
    #[case("image/jpeg", Vec::new(), "body")]
    #[case("image/jpeg", vec![0_u8; MAX_IMAGE_BYTES + 1], "body")]
    #[actix_web::test]
    async fn rejected_uploads_name_the_problem(
        #[case] content_type: &str,
        #[case] bytes: Vec<u8>,
        #[case] field: &str,
    ) {
        let app = test::init_service(test_app(mock_state()).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Barber)).to_request()).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/gallery")
                .cookie(session_cookie(&login))
                .insert_header((CONTENT_TYPE, content_type.to_owned()))
                .set_payload(bytes)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn clients_are_refused_before_the_body_is_read() {
        let mut gallery = MockGallery::new();
        gallery.expect_upload().never();
        let state = HttpState {
            gallery: Arc::new(gallery),
            ..mock_state()
        };
        let app = test::init_service(test_app(state).configure(routes)).await;
        let login = test::call_service(&app, login_request(principal(Role::Client)).to_request()).await;

        // Oversized, so reading it first would report a body error instead.
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/gallery")
                .cookie(session_cookie(&login))
                .insert_header((CONTENT_TYPE, "image/png"))
                .set_payload(vec![0_u8; MAX_IMAGE_BYTES + 1])
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn gallery_listing_is_public() {
        let mut gallery = MockGallery::new();
        gallery.expect_list().times(1).returning(|_| Ok(Vec::new()));
        let state = HttpState {
            gallery: Arc::new(gallery),
            ..mock_state()
        };
        let app = test::init_service(test_app(state).configure(routes)).await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/providers/{}/gallery", crate::domain::UserId::random()))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
