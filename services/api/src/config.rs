//! services/api/src/config.rs
//!
//! Runtime configuration for the api service, resolved once from the
//! environment at startup (with a `.env` file for local development).
//! Agent credentials live here and only here; they are attached to
//! upstream requests server-side and never reach a browser.

use std::net::SocketAddr;
use tracing::Level;

/// Raised when required configuration is missing or unparseable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(String),
    #[error("environment variable {0} has an invalid value: {1}")]
    InvalidValue(String, String),
}

/// Everything the service needs to run, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Full URL of the hosted agent inference endpoint.
    pub agent_endpoint: String,
    /// Shared secret sent as the `x-api-key` header on every agent call.
    pub agent_api_key: String,
    /// Agent identifier used for material generation requests.
    pub study_agent_id: String,
    /// Agent identifier used for tutor chat requests.
    pub tutor_agent_id: String,
    /// Origin allowed by CORS, normally the address serving the web client.
    pub cors_allowed_origin: String,
}

impl Config {
    /// Loads configuration from environment variables, reading a `.env`
    /// file from the current directory first. Tests never read `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("cannot parse '{}' as a log level", log_level_str),
            )
        })?;

        // --- Load Agent Settings (endpoint and key are required) ---
        let agent_endpoint = std::env::var("AGENT_ENDPOINT")
            .map_err(|_| ConfigError::MissingVar("AGENT_ENDPOINT".to_string()))?;
        if !agent_endpoint.starts_with("http://") && !agent_endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "AGENT_ENDPOINT".to_string(),
                format!("'{}' is not an http(s) URL", agent_endpoint),
            ));
        }

        let agent_api_key = std::env::var("AGENT_API_KEY")
            .map_err(|_| ConfigError::MissingVar("AGENT_API_KEY".to_string()))?;

        let study_agent_id = std::env::var("STUDY_AGENT_ID")
            .unwrap_or_else(|_| "study-material-agent".to_string());
        let tutor_agent_id =
            std::env::var("TUTOR_AGENT_ID").unwrap_or_else(|_| "tutor-agent".to_string());

        let cors_allowed_origin = std::env::var("CORS_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            log_level,
            agent_endpoint,
            agent_api_key,
            study_agent_id,
            tutor_agent_id,
            cors_allowed_origin,
        })
    }
}
