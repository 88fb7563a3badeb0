use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Duration;
use platter_core::ResetTokenGenerator;

use crate::auth::JwtKeys;
use crate::config::Config;
use crate::db::DbPool;
use crate::mail::Mailer;

/// Application state shared across all handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
    pub tokens: Arc<JwtKeys>,
    pub reset_tokens: Arc<ResetTokenGenerator>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let tokens = JwtKeys::new(
            &config.secret_key,
            Duration::minutes(config.access_token_minutes),
            Duration::days(config.refresh_token_days),
        );
        let reset_tokens = ResetTokenGenerator::new(&config.secret_key, config.reset_token_seconds);
        Self {
            pool: Arc::new(pool),
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            reset_tokens: Arc::new(reset_tokens),
            mailer,
        }
    }
}
