//! services/portal/src/config.rs
//!
//! Defines the portal's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the backend REST API, including the `/api` prefix.
    pub api_base_url: String,
    pub token_path: PathBuf,
    pub request_timeout: Duration,
    pub speech_language: String,
    pub log_level: Level,
    pub mock_bind_address: SocketAddr,
    pub mock_token_ttl: chrono::Duration,
    pub mock_allowed_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            token_path: PathBuf::from("./.portal/session.json"),
            request_timeout: Duration::from_secs(10),
            speech_language: "en-US".to_string(),
            log_level: Level::INFO,
            mock_bind_address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            mock_token_ttl: chrono::Duration::minutes(60),
            mock_allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        // --- Client Settings ---
        let api_base_url = std::env::var("PORTAL_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let token_path = std::env::var("PORTAL_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.token_path);

        let request_timeout = match std::env::var("PORTAL_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(parse_number("PORTAL_REQUEST_TIMEOUT_SECS", &raw)?),
            Err(_) => defaults.request_timeout,
        };

        let speech_language =
            std::env::var("PORTAL_SPEECH_LANG").unwrap_or(defaults.speech_language);

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Mock Backend Settings ---
        let mock_bind_address = match std::env::var("MOCK_BIND_ADDRESS") {
            Ok(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("MOCK_BIND_ADDRESS".to_string(), e.to_string())
            })?,
            Err(_) => defaults.mock_bind_address,
        };

        let mock_token_ttl = match std::env::var("MOCK_TOKEN_TTL_MINUTES") {
            Ok(raw) => {
                let minutes = parse_number("MOCK_TOKEN_TTL_MINUTES", &raw)?;
                chrono::Duration::minutes(minutes as i64)
            }
            Err(_) => defaults.mock_token_ttl,
        };

        let mock_allowed_origin =
            std::env::var("MOCK_ALLOWED_ORIGIN").unwrap_or(defaults.mock_allowed_origin);

        Ok(Self {
            api_base_url,
            token_path,
            request_timeout,
            speech_language,
            log_level,
            mock_bind_address,
            mock_token_ttl,
            mock_allowed_origin,
        })
    }
}

fn parse_number(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string()))
}
