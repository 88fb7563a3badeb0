pub mod get;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get as get_route, post};
use axum::Router;
use platter_core::image::MAX_FILE_SIZE;
use utoipa::OpenApi;

use super::paths;
use crate::state::AppState;

/// Room for multipart framing around a maximum-size file, so oversized
/// uploads reach the size check instead of failing inside the extractor.
const UPLOAD_BODY_LIMIT: usize = MAX_FILE_SIZE + 64 * 1024;

/// Returns the router for photo endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            paths::PHOTOS,
            post(upload::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(paths::PHOTO, get_route(get::get_photo))
        .route(paths::PHOTO_THUMBNAIL, get_route(get::get_photo_thumbnail))
}

#[derive(OpenApi)]
#[openapi(
    paths(upload::upload, get::get_photo, get::get_photo_thumbnail),
    components(schemas(upload::UploadPhotoRequest, upload::UploadPhotoResponse))
)]
pub struct ApiDoc;
