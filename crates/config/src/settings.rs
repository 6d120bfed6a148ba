//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{endpoints, models, storage, timeouts, tts};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote inference service (transcription and replies)
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Speech synthesis service
    #[serde(default)]
    pub tts: TtsConfig,

    /// Upload/output directories and upload limits
    #[serde(default)]
    pub storage: StorageConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_gemini()?;
        self.validate_server()?;
        self.validate_tts()?;
        self.validate_storage()?;
        Ok(())
    }

    /// The API key is the one setting without a usable default
    fn validate_gemini(&self) -> Result<(), ConfigError> {
        let gemini = &self.gemini;

        match gemini.api_key.as_deref().map(str::trim) {
            None | Some("") | Some(models::API_KEY_PLACEHOLDER) => {
                return Err(ConfigError::MissingField(
                    "gemini.api_key (set GEMINI_API_KEY; get one at \
                     https://makersuite.google.com/app/apikey)"
                        .to_string(),
                ));
            }
            Some(_) => {}
        }

        if gemini.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "gemini.model".to_string(),
                message: "Model name cannot be empty".to_string(),
            });
        }

        if !gemini.endpoint.starts_with("http://") && !gemini.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "gemini.endpoint".to_string(),
                message: format!("Must be an http(s) URL, got '{}'", gemini.endpoint),
            });
        }

        if gemini.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gemini.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    fn validate_tts(&self) -> Result<(), ConfigError> {
        let tts_config = &self.tts;

        if tts_config.max_chunk_chars == 0 || tts_config.max_chunk_chars > tts::MAX_CHUNK_CHARS_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "tts.max_chunk_chars".to_string(),
                message: format!(
                    "Must be between 1 and {}, got {}",
                    tts::MAX_CHUNK_CHARS_LIMIT,
                    tts_config.max_chunk_chars
                ),
            });
        }

        if tts_config.language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tts.language".to_string(),
                message: "Language code cannot be empty".to_string(),
            });
        }

        if tts_config.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tts.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_storage(&self) -> Result<(), ConfigError> {
        let storage_config = &self.storage;

        if storage_config.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.max_upload_bytes".to_string(),
                message: "Upload limit must be positive".to_string(),
            });
        }

        if storage_config.allowed_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.allowed_extensions".to_string(),
                message: "At least one audio extension must be allowed".to_string(),
            });
        }

        if let Some(bad) = storage_config
            .allowed_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(ConfigError::InvalidValue {
                field: "storage.allowed_extensions".to_string(),
                message: format!("Extensions must look like '.mp3', got '{}'", bad),
            });
        }

        if storage_config.upload_dir == storage_config.output_dir {
            return Err(ConfigError::InvalidValue {
                field: "storage.output_dir".to_string(),
                message: "Upload and output directories must differ".to_string(),
            });
        }

        Ok(())
    }

    /// Apply the flat variables used by the original deployment
    ///
    /// `lookup` abstracts the environment so tests don't mutate process state.
    pub fn apply_legacy_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key.trim().to_string());
        }

        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                message: format!("Not a valid port number: '{}'", port),
            })?;
        }

        if let Some(reload) = lookup("RELOAD") {
            self.server.reload = reload.trim().eq_ignore_ascii_case("true");
        }

        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Some(level) = lookup("LOG_LEVEL").filter(|l| !l.trim().is_empty()) {
            self.observability.log_level = level.trim().to_lowercase();
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Accepted for compatibility with the original deployment; has no effect
    #[serde(default)]
    pub reload: bool,

    /// CORS allowed origins; `*` allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            reload: false,
            cors_origins: default_cors_origins(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Gemini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; required at startup
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model ID
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// REST API base URL
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_gemini_timeout")]
    pub timeout_seconds: u64,

    /// Minimum gap between consecutive calls, in milliseconds
    #[serde(default = "default_min_request_interval")]
    pub min_request_interval_ms: u64,
}

fn default_gemini_model() -> String {
    models::GEMINI_MODEL.to_string()
}
fn default_gemini_endpoint() -> String {
    endpoints::GEMINI_DEFAULT.to_string()
}
fn default_gemini_timeout() -> u64 {
    timeouts::GEMINI_REQUEST_SECS
}
fn default_min_request_interval() -> u64 {
    timeouts::MIN_REQUEST_INTERVAL_MS
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            endpoint: default_gemini_endpoint(),
            timeout_seconds: default_gemini_timeout(),
            min_request_interval_ms: default_min_request_interval(),
        }
    }
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Base URL of the Google Translate host
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    /// Target language code
    #[serde(default = "default_tts_language")]
    pub language: String,

    /// Slower speech rate
    #[serde(default)]
    pub slow: bool,

    /// Request timeout in seconds
    #[serde(default = "default_tts_timeout")]
    pub timeout_seconds: u64,

    /// Longest text sent per TTS request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

fn default_tts_endpoint() -> String {
    endpoints::GOOGLE_TTS_DEFAULT.to_string()
}
fn default_tts_language() -> String {
    tts::LANGUAGE.to_string()
}
fn default_tts_timeout() -> u64 {
    timeouts::TTS_REQUEST_SECS
}
fn default_max_chunk_chars() -> usize {
    tts::MAX_CHUNK_CHARS
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            language: default_tts_language(),
            slow: false,
            timeout_seconds: default_tts_timeout(),
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}

impl TtsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where uploaded recordings are written
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Where synthesized replies are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Accepted upload extensions, with leading dot
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from(storage::UPLOAD_DIR)
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(storage::OUTPUT_DIR)
}
fn default_max_upload_bytes() -> usize {
    storage::MAX_UPLOAD_BYTES
}
fn default_allowed_extensions() -> Vec<String> {
    storage::ALLOWED_AUDIO_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable the Prometheus recorder and `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `.env`, files and environment
///
/// Priority (highest to lowest):
/// 1. Flat legacy variables (GEMINI_API_KEY, HOST, PORT, RELOAD, CORS_ORIGINS, LOG_LEVEL)
/// 2. Environment variables (SAHAYAK__ prefix)
/// 3. config/{env}.yaml (if env specified)
/// 4. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(ConfigError::ParseError(format!("Invalid .env file: {}", e)));
        }
    }

    load_settings_from(Path::new("config"), env, |key| std::env::var(key).ok())
}

fn load_settings_from<F>(
    config_dir: &Path,
    env: Option<&str>,
    lookup: F,
) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::from(config_dir.join("default")).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::from(config_dir.join(env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("SAHAYAK")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .with_list_parse_key("storage.allowed_extensions"),
    );

    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;

    settings.apply_legacy_env(lookup)?;

    // Validate
    settings.validate()?;

    Ok(settings)
}
