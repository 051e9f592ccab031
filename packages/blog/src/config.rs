use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Default number of posts promoted per scheduler tick.
pub const DEFAULT_PUBLISH_BATCH_LIMIT: i64 = 25;

/// Every minute, on the minute (tokio-cron-scheduler uses a seconds field).
pub const DEFAULT_PUBLISH_SCHEDULE: &str = "0 * * * * *";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Origin prepended to permanent links (e.g. `https://example.org`)
    pub app_origin: String,
    pub publish_batch_limit: i64,
    /// Cron expression for the scheduled publication job
    pub publish_schedule: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            app_origin: env::var("APP_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            publish_batch_limit: env::var("PUBLISH_BATCH_LIMIT")
                .unwrap_or_else(|_| DEFAULT_PUBLISH_BATCH_LIMIT.to_string())
                .parse()
                .context("PUBLISH_BATCH_LIMIT must be a valid number")?,
            publish_schedule: env::var("PUBLISH_SCHEDULE")
                .unwrap_or_else(|_| DEFAULT_PUBLISH_SCHEDULE.to_string()),
        })
    }
}
