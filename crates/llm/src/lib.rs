//! Gemini integration
//!
//! Features:
//! - Minimal REST client for `generateContent` with inline audio support
//! - Transcription adapter (Hindi audio → Devanagari text)
//! - Response adapter (Hindi text → short Hindi reply)
//! - Every call throttled through one shared [`RateLimiter`](sahayak_core::RateLimiter)

pub mod gemini;
pub mod prompt;
pub mod response;
pub mod transcription;

pub use gemini::{GeminiClient, GeminiConfig};
pub use response::GeminiResponder;
pub use transcription::GeminiTranscriber;

use sahayak_core::{GenerationError, TranscriptionError};
use thiserror::Error;

/// LLM transport errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for TranscriptionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyResponse => TranscriptionError::Empty,
            other => TranscriptionError::Remote(other.to_string()),
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyResponse => GenerationError::Empty,
            other => GenerationError::Remote(other.to_string()),
        }
    }
}
