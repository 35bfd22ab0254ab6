//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! Configuration failure is a different kind of failure from anything on the
//! request path: the process refuses to serve rather than falling back to a
//! built-in secret or treating every visitor as anonymous.

use lib_utils::envs::{get_env, get_env_parse_or};
use std::env;

/// Default session token lifetime: two weeks, in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 1_209_600;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for session token signing and verification
    ///
    /// **Must be at least 32 characters long.** The secret never appears in
    /// log lines, error messages, or response bodies.
    pub session_secret: String,

    /// Session token validity period in seconds
    ///
    /// After this period, users must re-authenticate.
    pub token_ttl_secs: i64,

    /// Public origin the app is served from (e.g. "https://channelhub.example")
    ///
    /// An https origin turns on the `Secure` cookie attribute.
    pub app_origin: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:data/channelhub.db".to_string());

        let session_secret = get_env("SESSION_SECRET")
            .map_err(|_| "SESSION_SECRET must be set in environment")?;

        let token_ttl_secs = get_env_parse_or("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)
            .map_err(|_| "TOKEN_TTL_SECS must be a valid number of seconds")?;

        let app_origin = env::var("APP_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            database_url,
            session_secret,
            token_ttl_secs,
            app_origin,
        })
    }

    /// Validate configuration values against security rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.session_secret.len() < 32 {
            return Err("SESSION_SECRET must be at least 32 characters long".to_string());
        }

        if self.token_ttl_secs < 60 || self.token_ttl_secs > 31_536_000 {
            return Err("TOKEN_TTL_SECS must be between 60 and 31536000 (1 year)".to_string());
        }

        Ok(())
    }

    /// Whether session cookies should carry the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.app_origin.starts_with("https://")
    }
}
