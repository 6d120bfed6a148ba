//! Gemini REST client
//!
//! Only the non-streaming `models/{model}:generateContent` call is used. Every
//! call first waits on the shared rate limiter, so the transcription and
//! response adapters together never exceed one call per interval.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sahayak_config::constants::{endpoints, models, timeouts};
use sahayak_config::GeminiConfig as GeminiSettings;
use sahayak_core::RateLimiter;
use serde::{Deserialize, Serialize};

use crate::LlmError;

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,
    /// Model ID
    pub model: String,
    /// API base URL (overridable for tests or a proxy)
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: models::GEMINI_MODEL.to_string(),
            endpoint: endpoints::GEMINI_DEFAULT.to_string(),
            timeout: Duration::from_secs(timeouts::GEMINI_REQUEST_SECS),
        }
    }

    /// Build from the validated application settings
    pub fn from_settings(settings: &GeminiSettings) -> Result<Self, LlmError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| LlmError::Configuration("gemini.api_key is not set".to_string()))?;

        Ok(Self {
            api_key,
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
            timeout: settings.timeout(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gemini client shared by both adapters
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
    limiter: Arc<RateLimiter>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, limiter: Arc<RateLimiter>) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Configuration(
                "GEMINI_API_KEY not set. Set it via environment or config.".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        tracing::debug!(
            model = %config.model,
            min_interval_ms = limiter.min_interval().as_millis() as u64,
            "Gemini client ready"
        );

        Ok(Self {
            config,
            client,
            limiter,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Throttle, send one request and return the trimmed text of the first candidate
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<String, LlmError> {
        self.limiter.wait_if_needed().await;

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        response.first_text().ok_or(LlmError::EmptyResponse)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    /// System instructions carry no role
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: String) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data,
            },
        }
    }
}

/// Base64 payload with its MIME type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();

        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::Server) -> GeminiClient {
        let config = GeminiConfig::new("test-key").with_endpoint(server.url());
        GeminiClient::new(config, Arc::new(RateLimiter::new(Duration::ZERO))).unwrap()
    }

    fn text_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text("hello")])],
            system_instruction: None,
        }
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = GeminiClient::new(GeminiConfig::new("  "), Arc::new(RateLimiter::default()));
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = GeminiSettings::default();
        assert!(GeminiConfig::from_settings(&settings).is_err());

        let settings = GeminiSettings {
            api_key: Some("k".to_string()),
            ..GeminiSettings::default()
        };
        let config = GeminiConfig::from_settings(&settings).unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_response_parsing_joins_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "  नमस्ते"}, {"text": " दोस्त  "}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text().as_deref(), Some("नमस्ते दोस्त"));
    }

    #[test]
    fn test_response_without_text_is_empty() {
        let no_candidates: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(no_candidates.first_text().is_none());

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(blocked.first_text().is_none());
    }

    #[tokio::test]
    async fn test_generate_content_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ठीक है\n"}]}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let text = client.generate_content(&text_request()).await.unwrap();

        assert_eq!(text, "ठीक है");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_content_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(429)
            .with_body(r#"{"error":{"message":"quota"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate_content(&text_request()).await.unwrap_err();

        match err {
            LlmError::Api(msg) => assert!(msg.contains("429")),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_content_empty_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate_content(&text_request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
