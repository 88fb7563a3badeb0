use crate::api::ErrorResponse;
use crate::auth::db::{find_user, find_user_by_email, revoke_refresh_tokens};
use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::mail::OutgoingMail;
use crate::models::User;
use crate::schema::users;
use crate::state::AppState;
use axum::extract::State;
use chrono::Utc;
use diesel::prelude::*;
use platter_core::password::{validate_password, UserAttributes};
use platter_core::uid::{decode_uid, encode_uid};
use platter_core::TokenSubject;
use serde::Deserialize;
use utoipa::ToSchema;

use super::MessageResponse;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResetConfirmRequest {
    /// Base64 user id from the reset link
    pub uidb64: String,
    pub token: String,
    pub new_password: String,
}

fn subject(user: &User) -> TokenSubject<'_> {
    TokenSubject {
        user_id: user.id,
        password_hash: &user.password_hash,
        last_login: user.last_login,
    }
}

/// Link the frontend turns into a reset form.
pub fn reset_link(frontend_url: &str, user: &User, token: &str) -> String {
    format!(
        "{}/reset-password?uidb64={}&token={}",
        frontend_url,
        encode_uid(user.id),
        token
    )
}

#[utoipa::path(
    post,
    path = "/api/user/password-reset",
    tag = "user",
    request_body = ResetRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 400, description = "No account with that email", body = ErrorResponse)
    )
)]
pub async fn request_reset(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResetRequest>,
) -> ApiResult<AppJson<MessageResponse>> {
    let mut conn = state.pool.get()?;
    let user = find_user_by_email(&mut conn, &req.email)?.ok_or_else(|| {
        ApiError::field("email", "No user is associated with this email address.")
    })?;

    let token = state.reset_tokens.make_token(subject(&user), Utc::now());
    let link = reset_link(&state.config.frontend_url, &user, &token);

    state.mailer.send(OutgoingMail {
        from: state.config.from_email.clone(),
        to: user.email.clone(),
        subject: "Password reset".to_string(),
        body: format!(
            "Hi {},\n\nUse the link below to choose a new password:\n\n{}\n\nIf you did not ask for this, you can ignore this email.\n",
            user.username, link
        ),
    });

    tracing::info!(user_id = %user.id, "password reset requested");

    Ok(AppJson(MessageResponse::new(
        "A password reset link has been sent to your email.",
    )))
}

#[utoipa::path(
    post,
    path = "/api/user/password-reset/confirm",
    tag = "user",
    request_body = ResetConfirmRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "New password fails the policy", body = ErrorResponse),
        (status = 401, description = "Reset link invalid or expired", body = ErrorResponse)
    )
)]
pub async fn confirm_reset(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResetConfirmRequest>,
) -> ApiResult<AppJson<MessageResponse>> {
    let invalid_link = || ApiError::Unauthorized("Invalid or expired reset link.".to_string());

    let user_id = decode_uid(&req.uidb64).map_err(|_| invalid_link())?;

    let mut conn = state.pool.get()?;
    let user = find_user(&mut conn, user_id)?.ok_or_else(invalid_link)?;

    let now = Utc::now();
    if let Err(e) = state
        .reset_tokens
        .check_token(subject(&user), &req.token, now)
    {
        tracing::debug!(user_id = %user.id, "reset token rejected: {}", e);
        return Err(invalid_link());
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

    conn.transaction::<_, ApiError, _>(|conn| {
        // Changing the hash is what spends the token. Only the confirm that
        // still sees the hash the token was checked against may change it.
        let updated = diesel::update(
            users::table
                .find(user.id)
                .filter(users::password_hash.eq(&user.password_hash)),
        )
        .set((
            users::password_hash.eq(&password_hash),
            users::updated_at.eq(now),
        ))
        .execute(conn)?;
        if updated == 0 {
            tracing::debug!(user_id = %user.id, "reset token already spent");
            return Err(invalid_link());
        }
        revoke_refresh_tokens(conn, user.id, now)?;
        Ok(())
    })?;

    tracing::info!(user_id = %user.id, "password reset");

    Ok(AppJson(MessageResponse::new(
        "Your password has been reset.",
    )))
}
