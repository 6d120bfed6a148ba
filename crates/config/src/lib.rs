//! Configuration management for the assistant
//!
//! Supports loading configuration from:
//! - `.env` files (via dotenvy)
//! - YAML/TOML files under `config/`
//! - Environment variables (SAHAYAK_ prefix, `__` separator)
//! - The flat variables of the original deployment (`GEMINI_API_KEY`,
//!   `HOST`, `PORT`, `RELOAD`, `CORS_ORIGINS`, `LOG_LEVEL`)
//!
//! Settings are read once at start and never change for the process lifetime.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, GeminiConfig, ObservabilityConfig, ServerConfig, Settings, StorageConfig,
    TtsConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
