// src/config.rs

use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub log_dir: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub connect_retries: u32,
    pub retry_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://linquiz.db?mode=rwc".to_string(),
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 3,
            connect_retries: 5,
            retry_delay_secs: 2,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        let log_dir = env::var("LOG_DIR").unwrap_or(defaults.log_dir);

        Self {
            database_url,
            rust_log,
            log_dir,
            max_connections: parse_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            acquire_timeout_secs: parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            ),
            connect_retries: parse_or("DB_CONNECT_RETRIES", defaults.connect_retries),
            retry_delay_secs: parse_or("DB_RETRY_DELAY_SECS", defaults.retry_delay_secs),
        }
    }
}

/// Reads a numeric variable, keeping the default when it is missing or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
