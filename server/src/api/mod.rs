pub mod comments;
pub mod feedback;
pub mod paths;
pub mod photos;
pub mod recipes;
pub mod taxonomy;
pub mod user;

use axum::Router;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use crate::error::FieldErrors;
use crate::state::AppState;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Field name -> messages, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// Every route, without state or middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(user::router())
        .merge(recipes::router())
        .merge(comments::router())
        .merge(taxonomy::router())
        .merge(feedback::router())
        .merge(photos::router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Platter", description = "Recipe sharing API"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        user::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        comments::ApiDoc::openapi(),
        taxonomy::ApiDoc::openapi(),
        feedback::ApiDoc::openapi(),
        photos::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = openapi();
        for path in [
            paths::SIGNUP,
            paths::PASSWORD_RESET_CONFIRM,
            paths::LIST,
            paths::RECIPE,
            paths::RECIPE_LIKE,
            paths::UPDATE,
            paths::COMMENT,
            paths::FILTERS,
            paths::TYPE,
            paths::FEEDBACK,
            paths::PHOTO_THUMBNAIL,
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let body = serde_json::to_value(ErrorResponse {
            error: "Not found".into(),
            fields: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"error": "Not found"}));
    }
}
