use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use anyhow::{Context, Result};
use platter_core::reset_token::DEFAULT_TIMEOUT_SECS;
use tracing::info;

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub secret_key: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub reset_token_seconds: i64,
    pub frontend_url: String,
    pub from_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: try_load("PLATTER_BIND_ADDR", "0.0.0.0:3000")?,
            secret_key: required("PLATTER_SECRET_KEY")?,
            access_token_minutes: try_load("PLATTER_ACCESS_TOKEN_MINUTES", "60")?,
            refresh_token_days: try_load("PLATTER_REFRESH_TOKEN_DAYS", "7")?,
            reset_token_seconds: try_load(
                "PLATTER_RESET_TOKEN_SECONDS",
                &DEFAULT_TIMEOUT_SECS.to_string(),
            )?,
            frontend_url: try_load::<String>("PLATTER_FRONTEND_URL", "http://localhost:3000")?
                .trim_end_matches('/')
                .to_string(),
            from_email: try_load("PLATTER_FROM_EMAIL", "noreply@platter.local")?,
        })
    }

    /// Settings for tests and tooling that never reach a real database.
    pub fn for_tests(secret_key: &str) -> Self {
        Self {
            database_url: String::new(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            secret_key: secret_key.to_string(),
            access_token_minutes: 60,
            refresh_token_days: 7,
            reset_token_seconds: DEFAULT_TIMEOUT_SECS,
            frontend_url: "http://localhost:3000".to_string(),
            from_email: "noreply@platter.local".to_string(),
        }
    }
}

fn required(key: &str) -> Result<String> {
    let value = env::var(key).with_context(|| format!("{key} must be set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{key} must not be empty");
    }
    Ok(value)
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_default_parses() {
        let value: i64 = try_load("PLATTER_TEST_UNSET_VARIABLE", "42").unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_try_load_rejects_garbage_default() {
        let result: Result<SocketAddr> = try_load("PLATTER_TEST_UNSET_VARIABLE", "not an addr");
        assert!(result.is_err());
    }
}
