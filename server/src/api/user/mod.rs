pub mod change_password;
pub mod deactivate;
pub mod delete;
pub mod password_reset;
pub mod profile;
pub mod reactivate;
pub mod refresh;
pub mod signin;
pub mod signup;

use axum::routing::{delete as delete_route, get, post};
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use super::paths;
use crate::state::AppState;

pub const MAX_USERNAME_LEN: usize = 150;

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Letters, digits and `@ . + - _`, up to 150 characters.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("This field may not be blank.".to_string());
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(format!(
            "Ensure this field has no more than {MAX_USERNAME_LEN} characters."
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }
    Ok(())
}

/// Returns the router for /api/user endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::SIGNUP, post(signup::signup))
        .route(paths::SIGNIN, post(signin::signin))
        .route(paths::TOKEN_REFRESH, post(refresh::refresh))
        .route(
            paths::PROFILE,
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route(paths::CHANGE_PASSWORD, post(change_password::change_password))
        .route(paths::DEACTIVATE, post(deactivate::deactivate))
        .route(paths::REACTIVATE, post(reactivate::reactivate))
        .route(paths::DELETE_ACCOUNT, delete_route(delete::delete_account))
        .route(paths::PASSWORD_RESET, post(password_reset::request_reset))
        .route(
            paths::PASSWORD_RESET_CONFIRM,
            post(password_reset::confirm_reset),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        signup::signup,
        signin::signin,
        refresh::refresh,
        profile::get_profile,
        profile::update_profile,
        change_password::change_password,
        deactivate::deactivate,
        reactivate::reactivate,
        delete::delete_account,
        password_reset::request_reset,
        password_reset::confirm_reset,
    ),
    components(schemas(
        MessageResponse,
        signup::SignupRequest,
        signup::SignupResponse,
        signin::SigninRequest,
        signin::TokenPair,
        refresh::RefreshRequest,
        refresh::RefreshResponse,
        profile::ProfileResponse,
        profile::UpdateProfileRequest,
        change_password::ChangePasswordRequest,
        reactivate::ReactivateRequest,
        password_reset::ResetRequest,
        password_reset::ResetConfirmRequest,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("chef.anna+1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"u".repeat(151)).is_err());
    }
}
