pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod social;
pub mod update;

use axum::routing::{delete as delete_route, get, patch, post};
use axum::Router;
use utoipa::OpenApi;

use super::paths;
use crate::recipes::read::{
    AuthorRef, PaginationMetadata, RecipeDetail, RecipeList, RecipeSummary, StepView,
};
use crate::recipes::social::ToggleOutcome;
use crate::recipes::write::{RecipeChanges, RecipeDraft};
use crate::state::AppState;

/// Returns the router for recipe endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::LIST, get(list::list_recipes))
        .route(paths::TOP_RECIPES, get(list::top_recipes))
        .route(paths::MY_RECIPES, get(list::my_recipes))
        .route(paths::SAVED_RECIPES, get(list::saved_recipes))
        .route(paths::RECIPE, get(get::get_recipe))
        .route(paths::RECIPE_LIKE, post(social::like_recipe))
        .route(paths::RECIPE_SAVE, post(social::save_recipe))
        .route(paths::CREATE, post(create::create_recipe))
        .route(paths::UPDATE, patch(update::update_recipe))
        .route(paths::DELETE, delete_route(delete::delete_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        list::top_recipes,
        list::my_recipes,
        list::saved_recipes,
        get::get_recipe,
        social::like_recipe,
        social::save_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        RecipeDraft,
        RecipeChanges,
        RecipeDetail,
        RecipeSummary,
        RecipeList,
        PaginationMetadata,
        AuthorRef,
        StepView,
        ToggleOutcome,
        platter_core::IngredientLine,
        platter_core::StepInput,
    ))
)]
pub struct ApiDoc;
