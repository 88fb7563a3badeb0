use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::recipes::read::visible_to;
use crate::schema::comments;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::{load_view, CommentRequest, CommentView};

fn not_found() -> ApiError {
    ApiError::NotFound("Comment not found".to_string())
}

/// Check the comment exists and `user_id` wrote it.
fn check_author(conn: &mut PgConnection, comment_id: Uuid, user_id: Uuid) -> ApiResult<()> {
    let author_id: Uuid = comments::table
        .find(comment_id)
        .select(comments::author_id)
        .first(conn)
        .optional()?
        .ok_or_else(not_found)?;
    if author_id != user_id {
        return Err(ApiError::Forbidden(
            "You do not have permission to modify this comment".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "The comment", body = CommentView),
        (status = 401, description = "Token present but invalid", body = ErrorResponse),
        (status = 404, description = "Comment not found or its recipe not visible", body = ErrorResponse)
    ),
    security(
        (),
        ("bearer_auth" = [])
    )
)]
pub async fn get_comment(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<CommentView>> {
    let viewer_id = viewer.map(|AuthUser(user)| user.id);
    let mut conn = state.pool.get()?;
    let view = load_view(&mut conn, id)?.ok_or_else(not_found)?;
    // Comments on a draft are as private as the draft
    if visible_to(&mut conn, view.recipe_id, viewer_id)? != Some(true) {
        return Err(not_found());
    }
    Ok(AppJson(view))
}

#[utoipa::path(
    patch,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentView),
        (status = 400, description = "Empty body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<CommentRequest>,
) -> ApiResult<AppJson<CommentView>> {
    let body = req.body()?;

    let mut conn = state.pool.get()?;
    check_author(&mut conn, id, user.id)?;

    diesel::update(comments::table.find(id))
        .set((comments::body.eq(body), comments::updated_at.eq(Utc::now())))
        .execute(&mut conn)?;

    let view = load_view(&mut conn, id)?.ok_or_else(not_found)?;
    Ok(AppJson(view))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get()?;
    check_author(&mut conn, id, user.id)?;
    diesel::delete(comments::table.find(id)).execute(&mut conn)?;
    Ok(StatusCode::NO_CONTENT)
}
