//! Request pipeline
//!
//! Turns one inbound request (an uploaded recording or plain text) into a
//! transcript, a Hindi reply and an MP3 of that reply:
//!
//! ```text
//! upload ─► validate ─► save ─► Transcriber ─► ResponseGenerator ─► SpeechSynthesizer ─► AudioTurn
//! text   ────────────────────────────────────► ResponseGenerator ─► SpeechSynthesizer ─► TextTurn
//! ```

pub mod orchestrator;
pub mod storage;
pub mod tts;
pub mod validation;

pub use orchestrator::Pipeline;
pub use storage::{file_size_mb, sanitize_file_name, AudioStorage, CleanupReport};
pub use tts::{split_text, GoogleTts, GoogleTtsConfig};
pub use validation::{UploadPolicy, ValidatedUpload};

use sahayak_core::{GenerationError, SynthesisError, TranscriptionError};
use thiserror::Error;

/// Shown to callers whenever transcription fails; quota exhaustion is the usual cause
pub const TRANSCRIPTION_FAILED_MESSAGE: &str = "Failed to transcribe audio. If you're getting \
rate limited, please wait 2-3 minutes and try again. Otherwise, ensure the audio is clear and in Hindi.";

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Rejected before any remote call
    #[error("{0}")]
    InvalidInput(String),

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("{}", TRANSCRIPTION_FAILED_MESSAGE)]
    TranscriptionFailed(#[source] TranscriptionError),

    #[error("Failed to generate response")]
    GenerationFailed(#[source] GenerationError),

    #[error("Failed to generate speech audio")]
    SynthesisFailed(#[source] SynthesisError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Storage(err.to_string())
    }
}

impl PipelineError {
    /// Short label for logs and error counters
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "invalid_input",
            PipelineError::PayloadTooLarge { .. } => "payload_too_large",
            PipelineError::TranscriptionFailed(_) => "transcription",
            PipelineError::GenerationFailed(_) => "generation",
            PipelineError::SynthesisFailed(_) => "synthesis",
            PipelineError::Storage(_) => "storage",
        }
    }
}
