//! Likes, saves and view counting.

use diesel::prelude::*;
use diesel::sql_types::Text;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::raw_sql::ADVISORY_XACT_LOCK;
use crate::schema::{recipe_likes, recipe_saves, recipes};

use super::read::visible_to;

/// The user/recipe sets a toggle flips membership in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialSet {
    Likes,
    Saves,
}

impl SocialSet {
    fn key(self) -> &'static str {
        match self {
            SocialSet::Likes => "like",
            SocialSet::Saves => "save",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ToggleOutcome {
    /// Whether the user is in the set after the toggle
    pub active: bool,
    /// Size of the set after the toggle
    pub count: i64,
}

macro_rules! flip {
    ($table:ident, $conn:expr, $recipe_id:expr, $user_id:expr) => {{
        let removed = diesel::delete(
            $table::table
                .filter($table::recipe_id.eq($recipe_id))
                .filter($table::user_id.eq($user_id)),
        )
        .execute($conn)?;
        if removed == 0 {
            diesel::insert_into($table::table)
                .values(($table::recipe_id.eq($recipe_id), $table::user_id.eq($user_id)))
                .execute($conn)?;
        }
        let count: i64 = $table::table
            .filter($table::recipe_id.eq($recipe_id))
            .count()
            .get_result($conn)?;
        ToggleOutcome {
            active: removed == 0,
            count,
        }
    }};
}

/// Flip the user's membership in `set` for a recipe they can see.
///
/// An advisory lock on (set, recipe, user) makes concurrent toggles by the
/// same user serialize, so two toggles always cancel out.
pub fn toggle(
    conn: &mut PgConnection,
    set: SocialSet,
    recipe_id: Uuid,
    user_id: Uuid,
) -> Result<ToggleOutcome, ApiError> {
    conn.transaction::<_, ApiError, _>(|conn| {
        if visible_to(conn, recipe_id, Some(user_id))? != Some(true) {
            return Err(ApiError::NotFound("Recipe not found".to_string()));
        }

        diesel::sql_query(ADVISORY_XACT_LOCK)
            .bind::<Text, _>(format!("{}:{}:{}", set.key(), recipe_id, user_id))
            .execute(conn)?;

        Ok(match set {
            SocialSet::Likes => flip!(recipe_likes, conn, recipe_id, user_id),
            SocialSet::Saves => flip!(recipe_saves, conn, recipe_id, user_id),
        })
    })
}

/// Count one view of a published recipe, in SQL. Returns the new count, or
/// `None` when there is no such published recipe.
pub fn record_view(conn: &mut PgConnection, recipe_id: Uuid) -> QueryResult<Option<i64>> {
    diesel::update(
        recipes::table
            .filter(recipes::id.eq(recipe_id))
            .filter(recipes::is_published.eq(true)),
    )
    .set(recipes::view_count.eq(recipes::view_count + 1_i64))
    .returning(recipes::view_count)
    .get_result(conn)
    .optional()
}
