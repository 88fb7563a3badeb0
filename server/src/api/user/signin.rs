use crate::api::ErrorResponse;
use crate::auth::db::{find_user_by_email, record_refresh_token};
use crate::auth::{verify_password, TokenType};
use crate::error::{ApiError, ApiResult, AppJson};
use crate::models::User;
use crate::schema::users;
use crate::state::AppState;
use axum::extract::State;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub(super) fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials.".to_string())
}

#[utoipa::path(
    post,
    path = "/api/user/signin",
    tag = "user",
    request_body(content = SigninRequest, example = json!({"email": "cook@example.com", "password": "saffron-rice-42"})),
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPair),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    AppJson(req): AppJson<SigninRequest>,
) -> ApiResult<AppJson<TokenPair>> {
    let mut conn = state.pool.get()?;

    let user = find_user_by_email(&mut conn, &req.email)?.ok_or_else(invalid_credentials)?;
    if !verify_password(&req.password, &user.password_hash) || !user.is_active {
        return Err(invalid_credentials());
    }

    let now = Utc::now();
    let user: User = diesel::update(users::table.find(user.id))
        .set(users::last_login.eq(Some(now)))
        .returning(User::as_returning())
        .get_result(&mut conn)?;

    let access = state
        .tokens
        .issue(&user, TokenType::Access, now)
        .map_err(|e| ApiError::internal("Failed to issue token", e))?;
    let refresh = state
        .tokens
        .issue(&user, TokenType::Refresh, now)
        .map_err(|e| ApiError::internal("Failed to issue token", e))?;
    record_refresh_token(&mut conn, user.id, &refresh)?;

    Ok(AppJson(TokenPair {
        access: access.token,
        refresh: refresh.token,
    }))
}
