use crate::api::ErrorResponse;
use crate::auth::db::revoke_refresh_tokens;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult, AppJson};
use crate::schema::users;
use crate::state::AppState;
use axum::extract::State;
use chrono::Utc;
use diesel::prelude::*;
use platter_core::password::{validate_password, UserAttributes};
use serde::Deserialize;
use utoipa::ToSchema;

use super::MessageResponse;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/user/change-password",
    tag = "user",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed; refresh tokens revoked", body = MessageResponse),
        (status = 400, description = "Wrong old password or weak new password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> ApiResult<AppJson<MessageResponse>> {
    if !verify_password(&req.old_password, &user.password_hash) {
        return Err(ApiError::field("old_password", "Wrong password."));
    }
    validate_password(
        &req.new_password,
        UserAttributes {
            username: Some(&user.username),
            email: Some(&user.email),
        },
    )
    .map_err(|errors| ApiError::password_policy("new_password", errors))?;

    let password_hash = hash_password(&req.new_password)
        .map_err(|e| ApiError::internal("Failed to hash password", e))?;

    let mut conn = state.pool.get()?;
    let now = Utc::now();
    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::update(users::table.find(user.id))
            .set((
                users::password_hash.eq(&password_hash),
                users::updated_at.eq(now),
            ))
            .execute(conn)?;
        revoke_refresh_tokens(conn, user.id, now)?;
        Ok(())
    })?;

    tracing::info!(user_id = %user.id, "password changed");

    Ok(AppJson(MessageResponse::new("Password updated successfully.")))
}
