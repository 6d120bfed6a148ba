//! Application State
//!
//! Shared state across all handlers. Settings are read once at startup and
//! never change afterwards.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use sahayak_config::Settings;
use sahayak_core::RateLimiter;
use sahayak_llm::{GeminiClient, GeminiConfig, GeminiResponder, GeminiTranscriber};
use sahayak_pipeline::{AudioStorage, GoogleTts, GoogleTtsConfig, Pipeline, UploadPolicy};

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration
    pub config: Arc<Settings>,
    /// Request pipeline with its injected adapters
    pub pipeline: Arc<Pipeline>,
    /// Set when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wrap an already assembled pipeline
    pub fn new(config: Settings, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            metrics: None,
        }
    }

    /// Build the Gemini and TTS adapters described by `config`
    ///
    /// One rate limiter is shared by transcription and reply generation.
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let limiter = Arc::new(RateLimiter::new(config.gemini.min_request_interval()));

        let gemini_config = GeminiConfig::from_settings(&config.gemini)
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        let client = Arc::new(
            GeminiClient::new(gemini_config, limiter)
                .map_err(|e| ServerError::Internal(e.to_string()))?,
        );

        let tts = GoogleTts::new(GoogleTtsConfig::from_settings(&config.tts))
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        let pipeline = Pipeline::new(
            Arc::new(GeminiTranscriber::new(client.clone())),
            Arc::new(GeminiResponder::new(client)),
            Arc::new(tts),
            AudioStorage::from_config(&config.storage),
            UploadPolicy::from_config(&config.storage),
        );

        Ok(Self::new(config, pipeline))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn storage(&self) -> &AudioStorage {
        self.pipeline.storage()
    }
}
