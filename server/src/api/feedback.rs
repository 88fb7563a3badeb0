use crate::api::{paths, ErrorResponse};
use crate::error::{ApiError, ApiResult, AppJson, FieldErrors};
use crate::models::{Feedback, NewFeedback};
use crate::schema::feedback;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Router};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use platter_core::email::{is_valid_email, normalize_email};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(row: Feedback) -> Self {
        Self {
            id: row.id,
            email: row.email,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

fn validate_feedback(req: &FeedbackRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !is_valid_email(req.email.trim()) {
        errors
            .entry("email".to_string())
            .or_default()
            .push("Enter a valid email address.".to_string());
    }
    if req.message.trim().is_empty() {
        errors
            .entry("message".to_string())
            .or_default()
            .push("This field may not be blank.".to_string());
    }
    errors
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    tag = "feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback stored", body = FeedbackResponse),
        (status = 400, description = "Invalid email or empty message", body = ErrorResponse)
    )
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    AppJson(req): AppJson<FeedbackRequest>,
) -> ApiResult<impl IntoResponse> {
    let errors = validate_feedback(&req);
    if !errors.is_empty() {
        return Err(ApiError::fields(errors));
    }

    let email = normalize_email(&req.email);
    let mut conn = state.pool.get()?;
    let row: Feedback = diesel::insert_into(feedback::table)
        .values(&NewFeedback {
            email: &email,
            message: req.message.trim(),
        })
        .returning(Feedback::as_returning())
        .get_result(&mut conn)?;

    tracing::info!(feedback_id = %row.id, "Feedback received");

    Ok((StatusCode::CREATED, AppJson(FeedbackResponse::from(row))))
}

/// Returns the router for the feedback endpoint
pub fn router() -> Router<AppState> {
    Router::new().route(paths::FEEDBACK, post(submit_feedback))
}

#[derive(OpenApi)]
#[openapi(
    paths(submit_feedback),
    components(schemas(FeedbackRequest, FeedbackResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, message: &str) -> FeedbackRequest {
        FeedbackRequest {
            email: email.into(),
            message: message.into(),
        }
    }

    #[test]
    fn test_valid_feedback() {
        assert!(validate_feedback(&request("cook@example.com", "More soups please")).is_empty());
    }

    #[test]
    fn test_bad_email_and_blank_message() {
        let errors = validate_feedback(&request("not-an-email", "   "));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("message"));
    }
}
