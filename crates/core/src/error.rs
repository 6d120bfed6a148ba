//! Adapter error kinds
//!
//! Every adapter reports expected "no result" cases as an explicit variant
//! instead of an empty value, so the orchestrator can map failures with an
//! exhaustive match.

use thiserror::Error;

/// Failure of the transcription adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    /// Transport or service error from the inference service
    #[error("Transcription request failed: {0}")]
    Remote(String),

    /// The service answered but produced no text
    #[error("Transcription returned no text")]
    Empty,
}

/// Failure of the reply generation adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Response generation failed: {0}")]
    Remote(String),

    #[error("Response generation returned no text")]
    Empty,
}

/// Failure of the speech synthesis adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Rejected locally, no remote call was made
    #[error("Empty text provided")]
    EmptyText,

    #[error("Speech synthesis request failed: {0}")]
    Remote(String),

    /// Writing the audio file failed
    #[error("Failed to save audio file: {0}")]
    Io(String),

    /// The write reported success but the file is not on disk
    #[error("Audio file missing after write: {0}")]
    Missing(String),
}
