use crate::api::ErrorResponse;
use crate::auth::AccountOwner;
use crate::error::ApiResult;
use crate::schema::users;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;

/// Remove the account. Recipes, comments, likes, saves, photos and refresh
/// tokens go with it through `ON DELETE CASCADE`.
#[utoipa::path(
    delete,
    path = "/api/user/delete",
    tag = "user",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_account(
    AccountOwner(user): AccountOwner,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get()?;
    diesel::delete(users::table.find(user.id)).execute(&mut conn)?;

    tracing::info!(user_id = %user.id, "account deleted");

    Ok(StatusCode::NO_CONTENT)
}
