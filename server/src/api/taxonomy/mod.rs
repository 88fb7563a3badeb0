pub mod options;
pub mod terms;

use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

use super::paths;
use crate::recipes::terms::Term;
use crate::state::AppState;

/// Returns the router for taxonomy endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::FILTERS, get(options::get_filters))
        .route(paths::OPTIONS, get(options::get_options))
        .route(paths::REGIONS, get(terms::list_regions))
        .route(paths::REGION, get(terms::get_region))
        .route(paths::SESSIONS, get(terms::list_sessions))
        .route(paths::SESSION, get(terms::get_session))
        .route(paths::CATEGORIES, get(terms::list_categories))
        .route(paths::CATEGORY, get(terms::get_category))
        .route(paths::TYPES, get(terms::list_types))
        .route(paths::TYPE, get(terms::get_type))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        options::get_filters,
        options::get_options,
        terms::list_regions,
        terms::get_region,
        terms::list_sessions,
        terms::get_session,
        terms::list_categories,
        terms::get_category,
        terms::list_types,
        terms::get_type,
    ),
    components(schemas(Term, options::TermName, options::TaxonomyOptions))
)]
pub struct ApiDoc;
