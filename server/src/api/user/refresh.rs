use crate::api::ErrorResponse;
use crate::auth::db::live_refresh_token_owner;
use crate::auth::TokenType;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::state::AppState;
use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

#[utoipa::path(
    post,
    path = "/api/user/token/refresh",
    tag = "user",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Refresh token invalid, expired or revoked", body = ErrorResponse)
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshRequest>,
) -> ApiResult<AppJson<RefreshResponse>> {
    let rejected = || ApiError::Unauthorized("Token is invalid or expired".to_string());

    let claims = state
        .tokens
        .decode(&req.refresh, TokenType::Refresh)
        .ok_or_else(rejected)?;

    let now = Utc::now();
    let mut conn = state.pool.get()?;
    let user = live_refresh_token_owner(&mut conn, claims.jti, now)?
        .filter(|u| u.id == claims.sub && u.is_active)
        .ok_or_else(rejected)?;

    let access = state
        .tokens
        .issue(&user, TokenType::Access, now)
        .map_err(|e| ApiError::internal("Failed to issue token", e))?;

    Ok(AppJson(RefreshResponse {
        access: access.token,
    }))
}
