use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiResult, AppJson};
use crate::recipes::read::{self, RecipeList, RecipeSummary, Scope};
use crate::state::AppState;
use axum::extract::State;
use axum_extra::extract::Query;
use platter_core::{ListParams, RecipeFilter};

#[utoipa::path(
    get,
    path = "/api/list",
    tag = "recipes",
    params(ListParams),
    responses(
        (status = 200, description = "Published recipes matching the filters", body = RecipeList),
        (status = 400, description = "Invalid parameters", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<AppJson<RecipeList>> {
    let mut conn = state.pool.get()?;
    let list = read::list_recipes(&mut conn, Scope::Public, &RecipeFilter::from(params))?;
    Ok(AppJson(list))
}

#[utoipa::path(
    get,
    path = "/api/top-recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "Most-liked published recipes", body = Vec<RecipeSummary>)
    )
)]
pub async fn top_recipes(State(state): State<AppState>) -> ApiResult<AppJson<Vec<RecipeSummary>>> {
    let mut conn = state.pool.get()?;
    Ok(AppJson(read::top_recipes(&mut conn)?))
}

#[utoipa::path(
    get,
    path = "/api/my-recipes",
    tag = "recipes",
    params(ListParams),
    responses(
        (status = 200, description = "The caller's recipes, published or not", body = RecipeList),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn my_recipes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<AppJson<RecipeList>> {
    let mut conn = state.pool.get()?;
    let list = read::list_recipes(&mut conn, Scope::Author(user.id), &RecipeFilter::from(params))?;
    Ok(AppJson(list))
}

#[utoipa::path(
    get,
    path = "/api/saved-recipes",
    tag = "recipes",
    params(ListParams),
    responses(
        (status = 200, description = "Recipes the caller saved", body = RecipeList),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn saved_recipes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<AppJson<RecipeList>> {
    let mut conn = state.pool.get()?;
    let list = read::list_recipes(&mut conn, Scope::Saved(user.id), &RecipeFilter::from(params))?;
    Ok(AppJson(list))
}
