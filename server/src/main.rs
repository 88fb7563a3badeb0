use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use platter_server::config::Config;
use platter_server::mail::LogMailer;
use platter_server::{api, app, db, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .context("Failed to serialize OpenAPI document")?;
        println!("{}", spec);
        return Ok(());
    }

    let _telemetry = telemetry::init_telemetry()?;

    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url)?;
    let bind_addr = config.bind_addr;

    let state = AppState::new(pool, config, Arc::new(LogMailer));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI spec available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}
