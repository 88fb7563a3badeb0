use crate::api::ErrorResponse;
use crate::auth::db::revoke_refresh_tokens;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::schema::users;
use crate::state::AppState;
use axum::extract::State;
use chrono::Utc;
use diesel::prelude::*;

use super::MessageResponse;

#[utoipa::path(
    post,
    path = "/api/user/deactivate",
    tag = "user",
    responses(
        (status = 200, description = "Account deactivated", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn deactivate(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> ApiResult<AppJson<MessageResponse>> {
    let mut conn = state.pool.get()?;
    let now = Utc::now();
    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::update(users::table.find(user.id))
            .set((users::is_active.eq(false), users::updated_at.eq(now)))
            .execute(conn)?;
        revoke_refresh_tokens(conn, user.id, now)?;
        Ok(())
    })?;

    tracing::info!(user_id = %user.id, "account deactivated");

    Ok(AppJson(MessageResponse::new(
        "Your account has been deactivated.",
    )))
}
