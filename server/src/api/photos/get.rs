use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::schema::photos;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use uuid::Uuid;

const CACHE_FOREVER: &str = "public, max-age=31536000, immutable";

fn not_found() -> ApiError {
    ApiError::NotFound("Photo not found".to_string())
}

fn image_response(content_type: String, data: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, CACHE_FOREVER.to_string()),
        ],
        data,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Original image bytes", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_photo(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let mut conn = state.pool.get()?;
    let (content_type, data): (String, Vec<u8>) = photos::table
        .find(id)
        .select((photos::content_type, photos::data))
        .first(&mut conn)
        .optional()?
        .ok_or_else(not_found)?;
    Ok(image_response(content_type, data))
}

#[utoipa::path(
    get,
    path = "/api/photos/{id}/thumbnail",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "200px JPEG thumbnail", content_type = "image/jpeg"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_photo_thumbnail(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let mut conn = state.pool.get()?;
    let thumbnail: Vec<u8> = photos::table
        .find(id)
        .select(photos::thumbnail)
        .first(&mut conn)
        .optional()?
        .ok_or_else(not_found)?;
    Ok(image_response("image/jpeg".to_string(), thumbnail))
}
