use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::models::User;
use crate::schema::{photos, users};
use crate::state::AppState;
use axum::extract::State;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use platter_core::filters::escape_like;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::validate_username;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub bio: String,
    pub profile_picture: Option<Uuid>,
    pub role: String,
    pub date_joined: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            bio: user.bio,
            profile_picture: user.profile_picture,
            role: user.role,
            date_joined: user.date_joined,
        }
    }
}

/// Only these fields are writable; email and role are not.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    /// Photo id, or `null` to clear
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub profile_picture: Option<Option<Uuid>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

#[derive(AsChangeset)]
#[diesel(table_name = users)]
struct ProfileChangeset<'a> {
    username: Option<&'a str>,
    bio: Option<&'a str>,
    profile_picture: Option<Option<Uuid>>,
    updated_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "user",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(AuthUser(user): AuthUser) -> AppJson<ProfileResponse> {
    AppJson(user.into())
}

#[utoipa::path(
    patch,
    path = "/api/user/profile",
    tag = "user",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> ApiResult<AppJson<ProfileResponse>> {
    let username = req.username.as_deref().map(str::trim);
    if let Some(username) = username {
        validate_username(username).map_err(|m| ApiError::field("username", m))?;
    }

    let mut conn = state.pool.get()?;

    if let Some(username) = username {
        let taken: bool = diesel::select(diesel::dsl::exists(
            users::table
                .filter(users::username.ilike(escape_like(username)))
                .filter(users::id.ne(user.id)),
        ))
        .get_result(&mut conn)?;
        if taken {
            return Err(ApiError::field(
                "username",
                "A user with that username already exists.",
            ));
        }
    }

    if let Some(Some(photo_id)) = req.profile_picture {
        let owned: bool = diesel::select(diesel::dsl::exists(
            photos::table
                .filter(photos::id.eq(photo_id))
                .filter(photos::user_id.eq(user.id)),
        ))
        .get_result(&mut conn)?;
        if !owned {
            return Err(ApiError::field("profile_picture", "Unknown photo."));
        }
    }

    let updated: User = diesel::update(users::table.find(user.id))
        .set(&ProfileChangeset {
            username,
            bio: req.bio.as_deref(),
            profile_picture: req.profile_picture,
            updated_at: Utc::now(),
        })
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::field("username", "A user with that username already exists.")
            }
            other => other.into(),
        })?;

    Ok(AppJson(updated.into()))
}
