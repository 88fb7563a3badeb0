//! Lookup-or-create and association of taxonomy terms.
//!
//! The four term tables share a shape (`id`, unique `name`), so each
//! operation is written once as a macro body and dispatched per kind.

use diesel::prelude::*;
use diesel::upsert::excluded;
use platter_core::TermKind;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, ToSchema)]
pub struct Term {
    pub id: Uuid,
    pub name: String,
}

macro_rules! upsert_term {
    ($table:ident, $conn:expr, $name:expr) => {{
        use crate::schema::$table::dsl as t;
        diesel::insert_into(t::$table)
            .values(t::name.eq($name))
            .on_conflict(t::name)
            .do_update()
            .set(t::name.eq(excluded(t::name)))
            .returning(t::id)
            .get_result::<Uuid>($conn)
    }};
}

macro_rules! list_terms {
    ($table:ident, $conn:expr) => {{
        use crate::schema::$table::dsl as t;
        t::$table
            .select((t::id, t::name))
            .order(t::name.asc())
            .load::<Term>($conn)
    }};
}

macro_rules! find_term {
    ($table:ident, $conn:expr, $id:expr) => {{
        use crate::schema::$table::dsl as t;
        t::$table
            .find($id)
            .select((t::id, t::name))
            .first::<Term>($conn)
            .optional()
    }};
}

macro_rules! relink {
    ($link:ident, $term_col:ident, $conn:expr, $recipe_id:expr, $ids:expr) => {{
        use crate::schema::$link::dsl as l;
        diesel::delete(l::$link.filter(l::recipe_id.eq($recipe_id))).execute($conn)?;
        let rows: Vec<_> = $ids
            .iter()
            .map(|id| (l::recipe_id.eq($recipe_id), l::$term_col.eq(*id)))
            .collect();
        if !rows.is_empty() {
            diesel::insert_into(l::$link)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute($conn)?;
        }
        Ok(())
    }};
}

macro_rules! linked_names {
    ($link:ident, $terms:ident, $conn:expr, $recipe_id:expr) => {{
        use crate::schema::{$link, $terms};
        $link::table
            .inner_join($terms::table)
            .filter($link::recipe_id.eq($recipe_id))
            .select($terms::name)
            .order($terms::name.asc())
            .load::<String>($conn)
    }};
}

/// Resolve a name to its term id, creating the term if needed.
///
/// A single `INSERT .. ON CONFLICT DO UPDATE .. RETURNING` statement, so
/// concurrent callers resolving the same new name all get the same row.
pub fn resolve(conn: &mut PgConnection, kind: TermKind, name: &str) -> QueryResult<Uuid> {
    match kind {
        TermKind::Region => upsert_term!(regions, conn, name),
        TermKind::Session => upsert_term!(sessions, conn, name),
        TermKind::Category => upsert_term!(categories, conn, name),
        TermKind::Type => upsert_term!(types, conn, name),
    }
}

/// Resolve normalized names. Names are upserted in sorted order so that
/// transactions touching overlapping sets lock rows in the same order.
pub fn resolve_all(
    conn: &mut PgConnection,
    kind: TermKind,
    names: &[String],
) -> QueryResult<Vec<Uuid>> {
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort();
    sorted
        .into_iter()
        .map(|name| resolve(conn, kind, name))
        .collect()
}

/// Replace every association of `kind` on a recipe with `term_ids`.
/// Regions are a column on the recipe, not an association.
pub fn replace_links(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    kind: TermKind,
    term_ids: &[Uuid],
) -> QueryResult<()> {
    match kind {
        TermKind::Region => Ok(()),
        TermKind::Session => relink!(recipe_sessions, session_id, conn, recipe_id, term_ids),
        TermKind::Category => relink!(recipe_categories, category_id, conn, recipe_id, term_ids),
        TermKind::Type => relink!(recipe_types, type_id, conn, recipe_id, term_ids),
    }
}

/// Names of the terms of `kind` attached to a recipe, alphabetically.
pub fn linked(conn: &mut PgConnection, recipe_id: Uuid, kind: TermKind) -> QueryResult<Vec<String>> {
    match kind {
        TermKind::Region => {
            use crate::schema::{recipes, regions};
            recipes::table
                .inner_join(regions::table)
                .filter(recipes::id.eq(recipe_id))
                .select(regions::name)
                .load::<String>(conn)
        }
        TermKind::Session => linked_names!(recipe_sessions, sessions, conn, recipe_id),
        TermKind::Category => linked_names!(recipe_categories, categories, conn, recipe_id),
        TermKind::Type => linked_names!(recipe_types, types, conn, recipe_id),
    }
}

pub fn list(conn: &mut PgConnection, kind: TermKind) -> QueryResult<Vec<Term>> {
    match kind {
        TermKind::Region => list_terms!(regions, conn),
        TermKind::Session => list_terms!(sessions, conn),
        TermKind::Category => list_terms!(categories, conn),
        TermKind::Type => list_terms!(types, conn),
    }
}

pub fn find(conn: &mut PgConnection, kind: TermKind, id: Uuid) -> QueryResult<Option<Term>> {
    match kind {
        TermKind::Region => find_term!(regions, conn, id),
        TermKind::Session => find_term!(sessions, conn, id),
        TermKind::Category => find_term!(categories, conn, id),
        TermKind::Type => find_term!(types, conn, id),
    }
}

/// Distinct ingredient names across all recipes, sorted.
pub fn ingredient_names(conn: &mut PgConnection) -> QueryResult<Vec<String>> {
    use crate::schema::recipe_ingredients;
    recipe_ingredients::table
        .select(recipe_ingredients::ingredient)
        .distinct()
        .order(recipe_ingredients::ingredient.asc())
        .load::<String>(conn)
}
