use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::db::find_user;
use super::jwt::{JwtKeys, TokenType};

/// Extractor that validates the bearer access token and provides the
/// authenticated, active user.
///
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User
/// }
/// ```
pub struct AuthUser(pub User);

/// Like [`AuthUser`] but also admits deactivated accounts. Only account
/// deletion uses it.
pub struct AccountOwner(pub User);

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
    Inactive,
    Unavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingHeader => (StatusCode::UNAUTHORIZED, "Missing Authorization header"),
            AuthError::InvalidHeader => (StatusCode::UNAUTHORIZED, "Invalid Authorization header"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Inactive => (StatusCode::UNAUTHORIZED, "User account is disabled"),
            AuthError::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database connection error",
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
                fields: None,
            }),
        )
            .into_response()
    }
}

/// Resolve the bearer token to a user row, active or not.
async fn user_from_parts<S>(parts: &Parts, state: &S) -> Result<User, AuthError>
where
    Arc<DbPool>: FromRef<S>,
    Arc<JwtKeys>: FromRef<S>,
{
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims = Arc::<JwtKeys>::from_ref(state)
        .decode(token, TokenType::Access)
        .ok_or(AuthError::InvalidToken)?;

    let pool = Arc::<DbPool>::from_ref(state);
    let mut conn = pool.get().map_err(|e| {
        tracing::error!("Failed to get DB connection for auth: {}", e);
        AuthError::Unavailable
    })?;

    find_user(&mut conn, claims.sub)
        .map_err(|e| {
            tracing::error!("Failed to load user for auth: {}", e);
            AuthError::Unavailable
        })?
        .ok_or(AuthError::InvalidToken)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
    Arc<JwtKeys>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = user_from_parts(parts, state).await?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(AuthUser(user))
    }
}

/// `Option<AuthUser>`: anonymous when there is no Authorization header. A
/// header that is present must still carry a valid token for an active user.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
    Arc<JwtKeys>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }
        <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

impl<S> FromRequestParts<S> for AccountOwner
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
    Arc<JwtKeys>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        user_from_parts(parts, state).await.map(AccountOwner)
    }
}
