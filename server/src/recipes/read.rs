//! Recipe listings and the full recipe view.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use platter_core::filters::contains_pattern;
use platter_core::{IngredientLine, ListParams, Ordering, RecipeFilter, TermKind};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Recipe;
use crate::raw_sql::{count_over, likes_count};
use crate::schema::{
    categories, recipe_categories, recipe_ingredients, recipe_likes, recipe_saves,
    recipe_sessions, recipe_steps, recipe_types, recipes, regions, sessions, types, users,
};

use super::terms;

/// How many recipes the top list shows.
pub const TOP_RECIPES: i64 = 6;

/// Which recipes a listing draws from before filters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Published recipes by anyone.
    Public,
    /// Everything the user wrote, published or not.
    Author(Uuid),
    /// What the user saved and can still see.
    Saved(Uuid),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Total number of items available
    pub total: i64,
    /// Number of items requested (limit)
    pub limit: i64,
    /// Number of items skipped (offset)
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<Uuid>,
    pub likes: i64,
    /// Author's username
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeList {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: PaginationMetadata,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StepView {
    pub step_no: i32,
    pub instruction: String,
    pub timer: Option<String>,
    pub image: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<Uuid>,
    pub author: AuthorRef,
    pub region: Option<String>,
    pub session: Vec<String>,
    pub category: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub ingredients: Vec<IngredientLine>,
    /// Ordered by `step_no`, then input order
    pub steps: Vec<StepView>,
    pub servings: i32,
    pub prep_time: i32,
    pub cook_time: i32,
    pub is_published: bool,
    pub likes: i64,
    pub saves: i64,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable)]
struct SummaryRow {
    id: Uuid,
    title: String,
    description: String,
    image: Option<Uuid>,
    author: String,
    likes: i64,
    created_at: DateTime<Utc>,
    /// Total count of all matching rows (from window function)
    total_count: i64,
}

pub fn list_recipes(
    conn: &mut PgConnection,
    scope: Scope,
    filter: &RecipeFilter,
) -> QueryResult<RecipeList> {
    // Patterns must outlive the boxed query
    let ingredient_pattern = filter.ingredient.as_deref().map(contains_pattern);
    let search_patterns: Vec<String> = filter
        .search_terms
        .iter()
        .map(|t| contains_pattern(t))
        .collect();

    let mut query = recipes::table.inner_join(users::table).into_boxed();

    query = match scope {
        Scope::Public => query.filter(recipes::is_published.eq(true)),
        Scope::Author(user_id) => query.filter(recipes::author_id.eq(user_id)),
        Scope::Saved(user_id) => query
            .filter(
                recipes::id.eq_any(
                    recipe_saves::table
                        .filter(recipe_saves::user_id.eq(user_id))
                        .select(recipe_saves::recipe_id),
                ),
            )
            .filter(
                recipes::is_published
                    .eq(true)
                    .or(recipes::author_id.eq(user_id)),
            ),
    };

    if let Some(region) = &filter.region {
        query = query.filter(
            recipes::region_id.eq_any(
                regions::table
                    .filter(regions::name.eq(region))
                    .select(regions::id.nullable()),
            ),
        );
    }

    // Every listed term must be attached (AND across values)
    for name in &filter.sessions {
        query = query.filter(
            recipes::id.eq_any(
                recipe_sessions::table
                    .inner_join(sessions::table)
                    .filter(sessions::name.eq(name))
                    .select(recipe_sessions::recipe_id),
            ),
        );
    }
    for name in &filter.categories {
        query = query.filter(
            recipes::id.eq_any(
                recipe_categories::table
                    .inner_join(categories::table)
                    .filter(categories::name.eq(name))
                    .select(recipe_categories::recipe_id),
            ),
        );
    }
    for name in &filter.types {
        query = query.filter(
            recipes::id.eq_any(
                recipe_types::table
                    .inner_join(types::table)
                    .filter(types::name.eq(name))
                    .select(recipe_types::recipe_id),
            ),
        );
    }

    if let Some(pattern) = &ingredient_pattern {
        query = query.filter(
            recipes::id.eq_any(
                recipe_ingredients::table
                    .filter(recipe_ingredients::ingredient.ilike(pattern))
                    .select(recipe_ingredients::recipe_id),
            ),
        );
    }

    for pattern in &search_patterns {
        query = query.filter(
            recipes::title
                .ilike(pattern)
                .or(recipes::description.ilike(pattern)),
        );
    }

    query = match filter.ordering {
        Ordering::CreatedAsc => query.order(recipes::created_at.asc()),
        Ordering::CreatedDesc => query.order(recipes::created_at.desc()),
        Ordering::LikesAsc => query
            .order(likes_count().asc())
            .then_order_by(recipes::created_at.desc()),
        Ordering::LikesDesc => query
            .order(likes_count().desc())
            .then_order_by(recipes::created_at.desc()),
    };

    let rows: Vec<SummaryRow> = query
        .select((
            recipes::id,
            recipes::title,
            recipes::description,
            recipes::image,
            users::username,
            likes_count(),
            recipes::created_at,
            count_over(),
        ))
        .limit(filter.limit)
        .offset(filter.offset)
        .load(conn)?;

    // Extract total from first result, or 0 if no results
    let total = rows.first().map(|r| r.total_count).unwrap_or(0);

    let recipes = rows
        .into_iter()
        .map(|r| RecipeSummary {
            id: r.id,
            title: r.title,
            description: r.description,
            image: r.image,
            likes: r.likes,
            author: r.author,
            created_at: r.created_at,
        })
        .collect();

    Ok(RecipeList {
        recipes,
        pagination: PaginationMetadata {
            total,
            limit: filter.limit,
            offset: filter.offset,
        },
    })
}

/// Most-liked published recipes.
pub fn top_recipes(conn: &mut PgConnection) -> QueryResult<Vec<RecipeSummary>> {
    let filter = RecipeFilter {
        ordering: Ordering::LikesDesc,
        limit: TOP_RECIPES,
        ..RecipeFilter::from(ListParams::default())
    };
    Ok(list_recipes(conn, Scope::Public, &filter)?.recipes)
}

/// Whether `viewer` may see the recipe: it is published or theirs.
/// `None` when the recipe does not exist.
pub fn visible_to(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    viewer: Option<Uuid>,
) -> QueryResult<Option<bool>> {
    let row: Option<(bool, Uuid)> = recipes::table
        .find(recipe_id)
        .select((recipes::is_published, recipes::author_id))
        .first(conn)
        .optional()?;
    Ok(row.map(|(published, author)| published || Some(author) == viewer))
}

/// Load the full aggregate.
pub fn recipe_detail(conn: &mut PgConnection, recipe_id: Uuid) -> QueryResult<Option<RecipeDetail>> {
    let Some((recipe, username)) = recipes::table
        .inner_join(users::table)
        .filter(recipes::id.eq(recipe_id))
        .select((Recipe::as_select(), users::username))
        .first::<(Recipe, String)>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let region = terms::linked(conn, recipe_id, TermKind::Region)?.into_iter().next();
    let session = terms::linked(conn, recipe_id, TermKind::Session)?;
    let category = terms::linked(conn, recipe_id, TermKind::Category)?;
    let kind = terms::linked(conn, recipe_id, TermKind::Type)?;

    let ingredients = recipe_ingredients::table
        .filter(recipe_ingredients::recipe_id.eq(recipe_id))
        .order(recipe_ingredients::position.asc())
        .select((recipe_ingredients::ingredient, recipe_ingredients::quantity))
        .load::<(String, String)>(conn)?
        .into_iter()
        .map(|(ingredient, quantity)| IngredientLine {
            ingredient,
            quantity,
        })
        .collect();

    let steps = recipe_steps::table
        .filter(recipe_steps::recipe_id.eq(recipe_id))
        .order((recipe_steps::step_no.asc(), recipe_steps::position.asc()))
        .select((
            recipe_steps::step_no,
            recipe_steps::instruction,
            recipe_steps::timer,
            recipe_steps::image,
        ))
        .load::<(i32, String, Option<String>, Option<Uuid>)>(conn)?
        .into_iter()
        .map(|(step_no, instruction, timer, image)| StepView {
            step_no,
            instruction,
            timer,
            image,
        })
        .collect();

    let likes: i64 = recipe_likes::table
        .filter(recipe_likes::recipe_id.eq(recipe_id))
        .count()
        .get_result(conn)?;
    let saves: i64 = recipe_saves::table
        .filter(recipe_saves::recipe_id.eq(recipe_id))
        .count()
        .get_result(conn)?;

    Ok(Some(RecipeDetail {
        id: recipe.id,
        title: recipe.title,
        description: recipe.description,
        image: recipe.image,
        author: AuthorRef {
            id: recipe.author_id,
            username,
        },
        region,
        session,
        category,
        kind,
        ingredients,
        steps,
        servings: recipe.servings,
        prep_time: recipe.prep_time,
        cook_time: recipe.cook_time,
        is_published: recipe.is_published,
        likes,
        saves,
        view_count: recipe.view_count,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }))
}
