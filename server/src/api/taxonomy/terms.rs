//! Read-only term endpoints. One list and one lookup per kind, all backed by
//! the same two helpers.

use crate::api::ErrorResponse;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::recipes::terms::{self, Term};
use crate::state::AppState;
use axum::extract::{Path, State};
use platter_core::TermKind;
use uuid::Uuid;

fn list_kind(state: &AppState, kind: TermKind) -> ApiResult<AppJson<Vec<Term>>> {
    let mut conn = state.pool.get()?;
    Ok(AppJson(terms::list(&mut conn, kind)?))
}

fn get_kind(state: &AppState, kind: TermKind, id: Uuid) -> ApiResult<AppJson<Term>> {
    let mut conn = state.pool.get()?;
    terms::find(&mut conn, kind, id)?
        .map(AppJson)
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", kind.label())))
}

#[utoipa::path(
    get,
    path = "/api/regions",
    tag = "taxonomy",
    responses(
        (status = 200, description = "All regions, ordered by name", body = Vec<Term>)
    )
)]
pub async fn list_regions(State(state): State<AppState>) -> ApiResult<AppJson<Vec<Term>>> {
    list_kind(&state, TermKind::Region)
}

#[utoipa::path(
    get,
    path = "/api/regions/{id}",
    tag = "taxonomy",
    params(
        ("id" = Uuid, Path, description = "Region ID")
    ),
    responses(
        (status = 200, description = "The region", body = Term),
        (status = 404, description = "Region not found", body = ErrorResponse)
    )
)]
pub async fn get_region(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<Term>> {
    get_kind(&state, TermKind::Region, id)
}

#[utoipa::path(
    get,
    path = "/api/sessions",
    tag = "taxonomy",
    responses(
        (status = 200, description = "All sessions, ordered by name", body = Vec<Term>)
    )
)]
pub async fn list_sessions(State(state): State<AppState>) -> ApiResult<AppJson<Vec<Term>>> {
    list_kind(&state, TermKind::Session)
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "taxonomy",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "The session", body = Term),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<Term>> {
    get_kind(&state, TermKind::Session, id)
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "taxonomy",
    responses(
        (status = 200, description = "All categories, ordered by name", body = Vec<Term>)
    )
)]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<AppJson<Vec<Term>>> {
    list_kind(&state, TermKind::Category)
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "taxonomy",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "The category", body = Term),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<Term>> {
    get_kind(&state, TermKind::Category, id)
}

#[utoipa::path(
    get,
    path = "/api/types",
    tag = "taxonomy",
    responses(
        (status = 200, description = "All types, ordered by name", body = Vec<Term>)
    )
)]
pub async fn list_types(State(state): State<AppState>) -> ApiResult<AppJson<Vec<Term>>> {
    list_kind(&state, TermKind::Type)
}

#[utoipa::path(
    get,
    path = "/api/types/{id}",
    tag = "taxonomy",
    params(
        ("id" = Uuid, Path, description = "Type ID")
    ),
    responses(
        (status = 200, description = "The type", body = Term),
        (status = 404, description = "Type not found", body = ErrorResponse)
    )
)]
pub async fn get_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<Term>> {
    get_kind(&state, TermKind::Type, id)
}
