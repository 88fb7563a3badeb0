use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use platter_core::{DraftError, PasswordPolicyError};
use thiserror::Error;

use crate::api::ErrorResponse;

/// Field name -> messages, as returned in a 400 body.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        fields: Option<FieldErrors>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            fields: None,
        }
    }

    /// A 400 carrying one message against one field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.clone()]);
        ApiError::Validation {
            message,
            fields: Some(fields),
        }
    }

    pub fn fields(fields: FieldErrors) -> Self {
        let message = fields
            .iter()
            .next()
            .and_then(|(name, msgs)| msgs.first().map(|m| format!("{name}: {m}")))
            .unwrap_or_else(|| "Invalid request".to_string());
        ApiError::Validation {
            message,
            fields: Some(fields),
        }
    }

    /// Password policy failures reported against `field`.
    pub fn password_policy(field: &str, errors: Vec<PasswordPolicyError>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(
            field.to_string(),
            errors.iter().map(ToString::to_string).collect(),
        );
        Self::fields(fields)
    }

    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!("{context}: {err}");
        ApiError::Internal(context.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation { message, fields } => ErrorResponse {
                error: message,
                fields,
            },
            ApiError::Internal(context) => ErrorResponse {
                error: context,
                fields: None,
            },
            other => ErrorResponse {
                error: other.to_string(),
                fields: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => ApiError::NotFound("Not found".to_string()),
            other => ApiError::internal("Database error", other),
        }
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        ApiError::internal("Database connection error", err)
    }
}

impl From<DraftError> for ApiError {
    fn from(err: DraftError) -> Self {
        ApiError::field(err.field, err.message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// `Json` whose rejections render as our 400 body instead of axum's
/// plain-text 422.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

impl<T: serde::Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(diesel::result::Error::RollbackTransaction).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_diesel_not_found_is_404() {
        let err = ApiError::from(diesel::result::Error::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_draft_error_keeps_field() {
        let err = ApiError::from(DraftError::new("title", "This field may not be blank."));
        match err {
            ApiError::Validation { fields: Some(f), .. } => {
                assert_eq!(f["title"], vec!["This field may not be blank."]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_internal_hides_details() {
        let err = ApiError::internal("Failed to hash password", "argon2 blew up");
        assert_eq!(err.to_string(), "Internal error: Failed to hash password");
    }
}
