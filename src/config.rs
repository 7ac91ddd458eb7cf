//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Values are read once at
//! startup and shared through `AppState`.

use std::env;

/// Default OpenAI-compatible endpoint used for plan generation.
pub const DEFAULT_GENERATION_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Default model requested from the generation endpoint.
pub const DEFAULT_GENERATION_MODEL: &str = "openai/gpt-4o";
/// Default completion budget for one generated plan.
pub const DEFAULT_GENERATION_MAX_TOKENS: u32 = 1000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Postgres connection URL
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// Base URL of the chat-completions API
    pub generation_base_url: String,
    /// Model name sent with each generation request
    pub generation_model: String,
    /// `max_tokens` sent with each generation request
    pub generation_max_tokens: u32,

    // --- Secrets ---
    /// Shared HS256 key used by the identity provider to sign session tokens
    pub identity_jwt_key: Vec<u8>,
    /// API key for the generation endpoint
    pub generation_api_key: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self::test_default()
    }
}

impl Config {
    /// Config with fixed placeholder values, for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            database_url: "postgresql://localhost:5432/aifit_test".to_string(),
            database_max_connections: 5,
            generation_base_url: "http://127.0.0.1:9/v1".to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_max_tokens: DEFAULT_GENERATION_MAX_TOKENS,
            identity_jwt_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            generation_api_key: "test_api_key".to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: parse_or("PORT", 8080)?,
            database_url: env::var("DATABASE_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            generation_base_url: env::var("GENERATION_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GENERATION_BASE_URL.to_string()),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string()),
            generation_max_tokens: parse_or(
                "GENERATION_MAX_TOKENS",
                DEFAULT_GENERATION_MAX_TOKENS,
            )?,

            identity_jwt_key: env::var("IDENTITY_JWT_KEY")
                .map_err(|_| ConfigError::Missing("IDENTITY_JWT_KEY"))?
                .trim()
                .as_bytes()
                .to_vec(),
            generation_api_key: env::var("OPENAI_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OPENAI_API_KEY"))?,
        })
    }
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
