use crate::api::ErrorResponse;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::recipes::read::{recipe_detail, RecipeDetail};
use crate::recipes::social::record_view;
use crate::state::AppState;
use axum::extract::{Path, State};
use uuid::Uuid;

fn not_found() -> ApiError {
    ApiError::NotFound("Recipe not found".to_string())
}

/// Every successful fetch counts as one view.
#[utoipa::path(
    get,
    path = "/api/recipe/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "The full recipe", body = RecipeDetail),
        (status = 404, description = "No such published recipe", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<RecipeDetail>> {
    let mut conn = state.pool.get()?;
    record_view(&mut conn, id)?.ok_or_else(not_found)?;
    let detail = recipe_detail(&mut conn, id)?.ok_or_else(not_found)?;
    Ok(AppJson(detail))
}
