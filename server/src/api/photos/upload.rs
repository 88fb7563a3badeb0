use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::models::NewPhoto;
use crate::photos::processing::process_photo;
use crate::schema::photos;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use platter_core::image::MAX_FILE_SIZE;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadPhotoResponse {
    pub id: Uuid,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoRequest {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

fn too_large() -> ApiError {
    ApiError::field(
        "file",
        format!("File too large. Maximum size is {MAX_FILE_SIZE} bytes"),
    )
}

fn multipart_error(context: &str, err: MultipartError) -> ApiError {
    tracing::warn!("{context}: {err}");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        ApiError::bad_request(format!("{context}: {}", err.body_text()))
    }
}

#[utoipa::path(
    post,
    path = "/api/photos",
    tag = "photos",
    request_body(content_type = "multipart/form-data", content = UploadPhotoRequest),
    responses(
        (status = 201, description = "Photo uploaded", body = UploadPhotoResponse),
        (status = 400, description = "Missing, oversized or unsupported file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart data", e))?
        .ok_or_else(|| ApiError::field("file", "No file provided"))?;

    let data = field
        .bytes()
        .await
        .map_err(|e| multipart_error("Failed to read file data", e))?;

    if data.len() > MAX_FILE_SIZE {
        return Err(too_large());
    }

    let processed = process_photo(&data).map_err(|e| ApiError::field("file", e))?;

    let mut conn = state.pool.get()?;
    let photo_id: Uuid = diesel::insert_into(photos::table)
        .values(&NewPhoto {
            user_id: user.id,
            content_type: &processed.content_type,
            data: &data,
            thumbnail: &processed.thumbnail,
        })
        .returning(photos::id)
        .get_result(&mut conn)?;

    tracing::info!(photo_id = %photo_id, user_id = %user.id, bytes = data.len(), "Photo uploaded");

    Ok((
        StatusCode::CREATED,
        AppJson(UploadPhotoResponse { id: photo_id }),
    ))
}
