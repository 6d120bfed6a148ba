//! Gemini-backed Hindi reply generation

use std::sync::Arc;

use async_trait::async_trait;
use sahayak_core::{GenerationError, ResponseGenerator};

use crate::gemini::GeminiClient;
use crate::prompt::reply_request;

/// Replies in short, polite Devanagari Hindi
pub struct GeminiResponder {
    client: Arc<GeminiClient>,
}

impl GeminiResponder {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResponseGenerator for GeminiResponder {
    async fn respond(&self, input: &str) -> Result<String, GenerationError> {
        let request = reply_request(input);

        match self.client.generate_content(&request).await {
            Ok(reply) => {
                tracing::info!(
                    chars = reply.chars().count(),
                    preview = %reply.chars().take(50).collect::<String>(),
                    "Response generated"
                );
                Ok(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "Response generation error");
                Err(e.into())
            }
        }
    }

    fn model_name(&self) -> &str {
        self.client.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GeminiConfig;
    use mockito::Matcher;
    use sahayak_core::RateLimiter;
    use std::time::Duration;

    fn responder_for(server: &mockito::Server) -> GeminiResponder {
        let config = GeminiConfig::new("test-key").with_endpoint(server.url());
        let client =
            GeminiClient::new(config, Arc::new(RateLimiter::new(Duration::ZERO))).unwrap();
        GeminiResponder::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_body(Matcher::Regex("systemInstruction".to_string()))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"नमस्ते, कैसे हैं आप?\n"}]}}]}"#)
            .create_async()
            .await;

        let responder = responder_for(&server);
        let reply = responder.respond("नमस्ते").await.unwrap();

        assert_eq!(reply, "नमस्ते, कैसे हैं आप?");
        assert_eq!(responder.model_name(), "gemini-2.5-flash");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_reply_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[]}}]}"#)
            .create_async()
            .await;

        let responder = responder_for(&server);
        assert_eq!(
            responder.respond("नमस्ते").await.unwrap_err(),
            GenerationError::Empty
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error() {
        // Nothing listens on port 9 in the test environment
        let config = GeminiConfig::new("test-key")
            .with_endpoint("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let client =
            GeminiClient::new(config, Arc::new(RateLimiter::new(Duration::ZERO))).unwrap();
        let responder = GeminiResponder::new(Arc::new(client));

        assert!(matches!(
            responder.respond("नमस्ते").await,
            Err(GenerationError::Remote(_))
        ));
    }
}
