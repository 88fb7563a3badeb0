use crate::api::ErrorResponse;
use crate::auth::db::find_user_by_email;
use crate::auth::verify_password;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::schema::users;
use crate::state::AppState;
use axum::extract::State;
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

use super::signin::invalid_credentials;
use super::MessageResponse;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReactivateRequest {
    pub email: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/user/reactivate",
    tag = "user",
    request_body = ReactivateRequest,
    responses(
        (status = 200, description = "Account reactivated", body = MessageResponse),
        (status = 400, description = "Account is already active", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn reactivate(
    State(state): State<AppState>,
    AppJson(req): AppJson<ReactivateRequest>,
) -> ApiResult<AppJson<MessageResponse>> {
    let mut conn = state.pool.get()?;

    let user = find_user_by_email(&mut conn, &req.email)?.ok_or_else(invalid_credentials)?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid_credentials());
    }
    if user.is_active {
        return Err(ApiError::bad_request("This account is already active."));
    }

    diesel::update(users::table.find(user.id))
        .set((users::is_active.eq(true), users::updated_at.eq(Utc::now())))
        .execute(&mut conn)?;

    tracing::info!(user_id = %user.id, "account reactivated");

    Ok(AppJson(MessageResponse::new(
        "Your account has been reactivated.",
    )))
}
