use crate::error::{ApiResult, AppJson};
use crate::recipes::terms::{self, Term};
use crate::state::AppState;
use axum::extract::State;
use diesel::PgConnection;
use platter_core::TermKind;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TermName {
    pub name: String,
}

/// Every term and ingredient name, for building filter and form choices.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TaxonomyOptions {
    pub types: Vec<TermName>,
    pub categories: Vec<TermName>,
    pub regions: Vec<TermName>,
    pub sessions: Vec<TermName>,
    /// Distinct, sorted
    pub ingredients: Vec<String>,
}

fn names(terms: Vec<Term>) -> Vec<TermName> {
    terms
        .into_iter()
        .map(|term| TermName { name: term.name })
        .collect()
}

fn load_options(conn: &mut PgConnection) -> diesel::QueryResult<TaxonomyOptions> {
    Ok(TaxonomyOptions {
        types: names(terms::list(conn, TermKind::Type)?),
        categories: names(terms::list(conn, TermKind::Category)?),
        regions: names(terms::list(conn, TermKind::Region)?),
        sessions: names(terms::list(conn, TermKind::Session)?),
        ingredients: terms::ingredient_names(conn)?,
    })
}

#[utoipa::path(
    get,
    path = "/api/filters",
    tag = "taxonomy",
    responses(
        (status = 200, description = "Values usable as list filters", body = TaxonomyOptions)
    )
)]
pub async fn get_filters(State(state): State<AppState>) -> ApiResult<AppJson<TaxonomyOptions>> {
    let mut conn = state.pool.get()?;
    Ok(AppJson(load_options(&mut conn)?))
}

#[utoipa::path(
    get,
    path = "/api/options",
    tag = "taxonomy",
    responses(
        (status = 200, description = "Values offered when writing a recipe", body = TaxonomyOptions)
    )
)]
pub async fn get_options(State(state): State<AppState>) -> ApiResult<AppJson<TaxonomyOptions>> {
    let mut conn = state.pool.get()?;
    Ok(AppJson(load_options(&mut conn)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_names_drop_ids() {
        let out = names(vec![Term {
            id: Uuid::new_v4(),
            name: "Dinner".into(),
        }]);
        assert_eq!(
            serde_json::to_value(out).unwrap(),
            serde_json::json!([{"name": "Dinner"}])
        );
    }
}
