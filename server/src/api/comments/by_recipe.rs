use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::models::{Comment, NewComment};
use crate::recipes::read::visible_to;
use crate::schema::{comments, users};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use uuid::Uuid;

use super::{load_view, CommentRequest, CommentView};

fn recipe_not_found() -> ApiError {
    ApiError::NotFound("Recipe not found".to_string())
}

#[utoipa::path(
    get,
    path = "/api/recipe/{id}/comments",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = Vec<CommentView>),
        (status = 401, description = "Token present but invalid", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not visible", body = ErrorResponse)
    ),
    security(
        (),
        ("bearer_auth" = [])
    )
)]
pub async fn list_comments(
    viewer: Option<AuthUser>,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> ApiResult<AppJson<Vec<CommentView>>> {
    let viewer_id = viewer.map(|AuthUser(user)| user.id);
    let mut conn = state.pool.get()?;
    if visible_to(&mut conn, recipe_id, viewer_id)? != Some(true) {
        return Err(recipe_not_found());
    }

    let rows: Vec<(Comment, String)> = comments::table
        .inner_join(users::table)
        .filter(comments::recipe_id.eq(recipe_id))
        .order((comments::created_at.asc(), comments::id.asc()))
        .select((Comment::as_select(), users::username))
        .load(&mut conn)?;

    Ok(AppJson(
        rows.into_iter()
            .map(|(comment, author)| CommentView::new(comment, author))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/recipe/{id}/comments",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentView),
        (status = 400, description = "Empty body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    AppJson(req): AppJson<CommentRequest>,
) -> ApiResult<impl IntoResponse> {
    let body = req.body()?;

    let mut conn = state.pool.get()?;
    if visible_to(&mut conn, recipe_id, Some(user.id))? != Some(true) {
        return Err(recipe_not_found());
    }

    let comment_id: Uuid = diesel::insert_into(comments::table)
        .values(&NewComment {
            recipe_id,
            author_id: user.id,
            body,
        })
        .returning(comments::id)
        .get_result(&mut conn)?;

    let view = load_view(&mut conn, comment_id)?
        .ok_or_else(|| ApiError::internal("Failed to load comment", "created comment vanished"))?;

    Ok((StatusCode::CREATED, AppJson(view)))
}
