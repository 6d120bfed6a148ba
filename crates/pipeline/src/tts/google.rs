//! Google Translate TTS client

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use sahayak_config::constants::{endpoints, timeouts, tts};
use sahayak_config::TtsConfig;
use sahayak_core::{AudioArtifact, SpeechSynthesizer, SynthesisError};

use super::chunker::split_text;

/// Browser-like agent; the endpoint refuses some default client agents
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
Chrome/120.0 Safari/537.36";

/// Google TTS client configuration
#[derive(Debug, Clone)]
pub struct GoogleTtsConfig {
    /// Base URL; requests go to `{endpoint}/translate_tts`
    pub endpoint: String,
    /// Language code
    pub language: String,
    /// Slower speech rate
    pub slow: bool,
    /// Per-chunk request timeout
    pub timeout: Duration,
    /// Maximum characters per request
    pub max_chunk_chars: usize,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::GOOGLE_TTS_DEFAULT.to_string(),
            language: tts::LANGUAGE.to_string(),
            slow: false,
            timeout: Duration::from_secs(timeouts::TTS_REQUEST_SECS),
            max_chunk_chars: tts::MAX_CHUNK_CHARS,
        }
    }
}

impl GoogleTtsConfig {
    pub fn from_settings(settings: &TtsConfig) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            language: settings.language.clone(),
            slow: settings.slow,
            timeout: settings.timeout(),
            max_chunk_chars: settings.max_chunk_chars,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Speech synthesizer backed by Google Translate TTS (MP3 output)
pub struct GoogleTts {
    config: GoogleTtsConfig,
    client: Client,
}

impl GoogleTts {
    pub fn new(config: GoogleTtsConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SynthesisError::Remote(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Fetch the MP3 for one chunk
    async fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}/translate_tts", self.config.endpoint.trim_end_matches('/'));
        let speed = if self.config.slow { "0.24" } else { "1" };
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", self.config.language.as_str()),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SynthesisError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Remote(format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Remote(e.to_string()))?;
        if bytes.is_empty() {
            return Err(SynthesisError::Remote("Empty audio body".to_string()));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(
        &self,
        text: &str,
        output: &Path,
    ) -> Result<AudioArtifact, SynthesisError> {
        if text.trim().is_empty() {
            tracing::error!("Empty text provided");
            return Err(SynthesisError::EmptyText);
        }

        let chunks = split_text(text, self.config.max_chunk_chars);
        let total = chunks.len();
        tracing::debug!(chunks = total, chars = text.chars().count(), "Synthesizing speech");

        // MP3 frames are self-delimiting, so per-chunk files concatenate cleanly
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, idx, total).await?;
            audio.extend_from_slice(&bytes);
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SynthesisError::Io(e.to_string()))?;
        }
        tokio::fs::write(output, &audio)
            .await
            .map_err(|e| SynthesisError::Io(e.to_string()))?;

        match tokio::fs::try_exists(output).await {
            Ok(true) => {
                tracing::info!(path = %output.display(), bytes = audio.len(), "Audio saved");
                Ok(AudioArtifact::mpeg(output))
            }
            _ => {
                tracing::error!(path = %output.display(), "Failed to save audio file");
                Err(SynthesisError::Missing(output.display().to_string()))
            }
        }
    }

    fn engine_name(&self) -> &str {
        "google-translate-tts"
    }
}
