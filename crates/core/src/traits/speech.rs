//! Speech processing traits

use async_trait::async_trait;
use std::path::Path;

use crate::audio::{AudioArtifact, AudioFormat};
use crate::error::{SynthesisError, TranscriptionError};

/// Speech-to-Text interface
///
/// Implementations:
/// - `GeminiTranscriber` - hosted Gemini model with inline audio
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn Transcriber> = Arc::new(GeminiTranscriber::new(client));
/// let transcript = stt.transcribe(&bytes, AudioFormat::Webm).await?;
/// println!("Transcribed: {}", transcript);
/// ```
#[async_trait]
pub trait Transcriber: Send + Sync + 'static {
    /// Transcribe a complete recording into Devanagari text
    ///
    /// # Arguments
    /// * `audio` - Raw bytes of an already validated upload
    /// * `format` - Container format, used to label the inline data
    ///
    /// # Returns
    /// The trimmed transcript; never empty on `Ok`
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<String, TranscriptionError>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}

/// Text-to-Speech interface
///
/// Implementations:
/// - `GoogleTts` - Google Translate TTS endpoint (MP3)
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Synthesize `text` and write the audio to `output`
    ///
    /// Implementations must reject empty or whitespace-only text without a
    /// remote call, and must confirm the file exists before returning `Ok`.
    async fn synthesize(&self, text: &str, output: &Path)
        -> Result<AudioArtifact, SynthesisError>;

    /// Get engine name for logging
    fn engine_name(&self) -> &str;
}
