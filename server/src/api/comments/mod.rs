pub mod by_id;
pub mod by_recipe;

use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use super::paths;
use crate::error::ApiError;
use crate::models::Comment;
use crate::schema::{comments, users};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentView {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub author_id: Uuid,
    /// Author's username
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    fn new(comment: Comment, author: String) -> Self {
        Self {
            id: comment.id,
            recipe_id: comment.recipe_id,
            author_id: comment.author_id,
            author,
            body: comment.body,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub body: String,
}

impl CommentRequest {
    fn body(&self) -> Result<&str, ApiError> {
        let body = self.body.trim();
        if body.is_empty() {
            return Err(ApiError::field("body", "This field may not be blank."));
        }
        Ok(body)
    }
}

fn load_view(conn: &mut PgConnection, comment_id: Uuid) -> QueryResult<Option<CommentView>> {
    comments::table
        .inner_join(users::table)
        .filter(comments::id.eq(comment_id))
        .select((Comment::as_select(), users::username))
        .first::<(Comment, String)>(conn)
        .optional()
        .map(|row| row.map(|(comment, author)| CommentView::new(comment, author)))
}

/// Returns the router for comment endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            paths::RECIPE_COMMENTS,
            get(by_recipe::list_comments).post(by_recipe::create_comment),
        )
        .route(
            paths::COMMENT,
            get(by_id::get_comment)
                .patch(by_id::update_comment)
                .delete(by_id::delete_comment),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        by_recipe::list_comments,
        by_recipe::create_comment,
        by_id::get_comment,
        by_id::update_comment,
        by_id::delete_comment,
    ),
    components(schemas(CommentView, CommentRequest))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_body_rejected() {
        let req = CommentRequest { body: "  \n".into() };
        assert!(req.body().is_err());
        let req = CommentRequest {
            body: " Lovely! ".into(),
        };
        assert_eq!(req.body().unwrap(), "Lovely!");
    }
}
