use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiResult, AppJson};
use crate::recipes::social::{toggle, SocialSet, ToggleOutcome};
use crate::state::AppState;
use axum::extract::{Path, State};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/recipe/{id}/like",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Like state after the toggle", body = ToggleOutcome),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn like_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<ToggleOutcome>> {
    let mut conn = state.pool.get()?;
    Ok(AppJson(toggle(&mut conn, SocialSet::Likes, id, user.id)?))
}

#[utoipa::path(
    post,
    path = "/api/recipe/{id}/save",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Save state after the toggle", body = ToggleOutcome),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<ToggleOutcome>> {
    let mut conn = state.pool.get()?;
    Ok(AppJson(toggle(&mut conn, SocialSet::Saves, id, user.id)?))
}
