use crate::api::ErrorResponse;
use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult, AppJson, FieldErrors};
use crate::models::{NewUser, User};
use crate::schema::users;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use platter_core::email::{is_valid_email, normalize_email};
use platter_core::filters::escape_like;
use platter_core::password::{validate_password, UserAttributes};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::validate_username;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    /// Must repeat `password`
    pub password2: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

fn push(fields: &mut FieldErrors, field: &str, message: impl Into<String>) {
    fields
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

/// Everything that can be checked without touching storage.
pub fn validate_signup(req: &SignupRequest) -> FieldErrors {
    let mut fields = FieldErrors::new();
    let email = normalize_email(&req.email);
    let username = req.username.trim();

    if !is_valid_email(&email) {
        push(&mut fields, "email", "Enter a valid email address.");
    }
    if let Err(message) = validate_username(username) {
        push(&mut fields, "username", message);
    }
    if req.password != req.password2 {
        push(&mut fields, "password", "Passwords do not match.");
    } else if let Err(errors) = validate_password(
        &req.password,
        UserAttributes {
            username: Some(username),
            email: Some(&email),
        },
    ) {
        for err in errors {
            push(&mut fields, "password", err.to_string());
        }
    }

    fields
}

#[utoipa::path(
    post,
    path = "/api/user/signup",
    tag = "user",
    request_body(content = SignupRequest, example = json!({
        "email": "cook@example.com",
        "username": "cook",
        "password": "saffron-rice-42",
        "password2": "saffron-rice-42"
    })),
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid or taken fields", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut fields = validate_signup(&req);
    if !fields.is_empty() {
        return Err(ApiError::fields(fields));
    }

    let email = normalize_email(&req.email);
    let username = req.username.trim();

    let mut conn = state.pool.get()?;

    let email_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::email.eq(&email)),
    ))
    .get_result(&mut conn)?;
    if email_taken {
        push(&mut fields, "email", "A user with that email already exists.");
    }
    let username_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::username.ilike(escape_like(username))),
    ))
    .get_result(&mut conn)?;
    if username_taken {
        push(&mut fields, "username", "A user with that username already exists.");
    }
    if !fields.is_empty() {
        return Err(ApiError::fields(fields));
    }

    let password_hash =
        hash_password(&req.password).map_err(|e| ApiError::internal("Failed to hash password", e))?;

    let user: User = diesel::insert_into(users::table)
        .values(&NewUser {
            email: &email,
            username,
            password_hash: &password_hash,
        })
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(|e| match e {
            // Lost a race with a concurrent signup
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::bad_request("A user with that email or username already exists.")
            }
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, "account created");

    Ok((
        StatusCode::CREATED,
        AppJson(SignupResponse {
            id: user.id,
            email: user.email,
            username: user.username,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(password: &str, password2: &str) -> SignupRequest {
        SignupRequest {
            email: "Cook@Example.com".into(),
            username: "cook".into(),
            password: password.into(),
            password2: password2.into(),
        }
    }

    #[test]
    fn test_valid_signup_has_no_errors() {
        assert!(validate_signup(&req("saffron-rice-42", "saffron-rice-42")).is_empty());
    }

    #[test]
    fn test_mismatched_passwords() {
        let fields = validate_signup(&req("saffron-rice-42", "saffron-rice-43"));
        assert_eq!(fields["password"], vec!["Passwords do not match."]);
    }

    #[test]
    fn test_weak_password_reports_policy() {
        let fields = validate_signup(&req("12345", "12345"));
        assert!(fields["password"].len() >= 2);
    }

    #[test]
    fn test_bad_email() {
        let mut r = req("saffron-rice-42", "saffron-rice-42");
        r.email = "not-an-email".into();
        assert!(validate_signup(&r).contains_key("email"));
    }
}
