pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod mail;
pub mod models;
pub mod photos;
pub mod raw_sql;
pub mod recipes;
pub mod schema;
pub mod state;
pub mod telemetry;

use axum::Router;
use utoipa_swagger_ui::SwaggerUi;

pub use state::AppState;

/// The complete HTTP application: API routes, Swagger UI and request tracing.
pub fn app(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    let router = Router::new()
        .merge(api::router())
        .merge(swagger_ui)
        .with_state(state);

    telemetry::with_http_tracing(router)
}
