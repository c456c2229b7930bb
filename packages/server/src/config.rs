use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When unset the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl: Duration,
    pub totp_issuer: String,
    pub bcrypt_cost: u32,
    pub http: HttpConfig,
}

/// Settings the HTTP router is built from
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConfig {
    pub login_rate_limit: RateLimitConfig,
    /// Behind one reverse proxy: take the client IP from the hop it appends
    /// to `X-Forwarded-For` instead of the socket address
    pub trust_proxy: bool,
}

/// Login attempts allowed per client within a window
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_attempts: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            port: parse_or("PORT", 3000)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "campus-directory".to_string()),
            jwt_ttl: Duration::from_secs(parse_or::<u64>("JWT_TTL_MINUTES", 15)? * 60),
            totp_issuer: env::var("TOTP_ISSUER")
                .unwrap_or_else(|_| "Campus Directory".to_string()),
            bcrypt_cost: parse_or("BCRYPT_COST", 10)?,
            http: HttpConfig {
                login_rate_limit: RateLimitConfig {
                    max_attempts: parse_or("LOGIN_RATE_LIMIT_MAX", 3)?,
                    window: Duration::from_secs(parse_or("LOGIN_RATE_LIMIT_WINDOW_SECS", 900)?),
                },
                trust_proxy: parse_or("TRUST_PROXY", false)?,
            },
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
