use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::recipes::read::{recipe_detail, RecipeDetail};
use crate::recipes::write::{update_recipe as apply_changes, RecipeChanges};
use crate::state::AppState;
use axum::extract::{Path, State};
use uuid::Uuid;

#[utoipa::path(
    patch,
    path = "/api/{id}/update",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeChanges,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeDetail),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(changes): AppJson<RecipeChanges>,
) -> ApiResult<AppJson<RecipeDetail>> {
    let planned = changes.plan()?;

    let mut conn = state.pool.get()?;
    apply_changes(&mut conn, id, user.id, &planned)?;
    let detail = recipe_detail(&mut conn, id)?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    Ok(AppJson(detail))
}
