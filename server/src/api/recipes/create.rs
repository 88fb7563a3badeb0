use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::recipes::read::{recipe_detail, RecipeDetail};
use crate::recipes::write::{create_recipe as store_recipe, RecipeDraft};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

#[utoipa::path(
    post,
    path = "/api/create",
    tag = "recipes",
    request_body(content = RecipeDraft, example = json!({
        "title": "Chana Masala",
        "description": "Chickpeas in a spiced tomato gravy",
        "region": "Indian",
        "session": ["Lunch", "Dinner"],
        "category": ["Vegetarian"],
        "type": ["Main"],
        "ingredients": [{"ingredient": "Chickpeas", "quantity": "2 cups"}],
        "steps": [{"instruction": "Soak the chickpeas overnight"}]
    })),
    responses(
        (status = 201, description = "Recipe created", body = RecipeDetail),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppJson(draft): AppJson<RecipeDraft>,
) -> ApiResult<impl IntoResponse> {
    let planned = draft.plan()?;

    let mut conn = state.pool.get()?;
    let recipe_id = store_recipe(&mut conn, user.id, &planned)?;
    let detail = recipe_detail(&mut conn, recipe_id)?
        .ok_or_else(|| ApiError::internal("Failed to load recipe", "created recipe vanished"))?;

    tracing::info!(recipe_id = %recipe_id, author_id = %user.id, "recipe created");

    Ok((StatusCode::CREATED, AppJson(detail)))
}
