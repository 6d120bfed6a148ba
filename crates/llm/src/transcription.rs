//! Gemini-backed speech-to-text

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sahayak_core::{AudioFormat, Transcriber, TranscriptionError};

use crate::gemini::GeminiClient;
use crate::prompt::transcription_request;
use crate::LlmError;

/// Sends the whole recording inline and asks for a Devanagari transcript
pub struct GeminiTranscriber {
    client: Arc<GeminiClient>,
}

impl GeminiTranscriber {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

/// Base64 of a 25 MB upload is CPU-bound; keep it off the async workers
async fn encode_audio(audio: &[u8]) -> Result<String, LlmError> {
    let owned = audio.to_vec();
    tokio::task::spawn_blocking(move || STANDARD.encode(owned))
        .await
        .map_err(|e| LlmError::Encoding(e.to_string()))
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<String, TranscriptionError> {
        let encoded = encode_audio(audio).await?;
        let request = transcription_request(encoded, format.mime_type());

        match self.client.generate_content(&request).await {
            Ok(transcript) => {
                tracing::info!(
                    chars = transcript.chars().count(),
                    preview = %transcript.chars().take(50).collect::<String>(),
                    "Transcription complete"
                );
                Ok(transcript)
            }
            Err(e) => {
                tracing::error!(error = %e, bytes = audio.len(), "Transcription error");
                Err(e.into())
            }
        }
    }

    fn model_name(&self) -> &str {
        self.client.model()
    }
}
