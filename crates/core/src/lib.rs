//! Core traits and types for the Hindi voice assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Adapter traits for the remote backends (transcription, reply, synthesis)
//! - Request and turn types flowing through the pipeline
//! - Audio artifact and format types
//! - Typed adapter error kinds
//! - The process-wide rate limiter guarding the inference service

pub mod audio;
pub mod conversation;
pub mod error;
pub mod rate_limit;
pub mod traits;

pub use audio::{AudioArtifact, AudioFormat, MPEG_CONTENT_TYPE};
pub use conversation::{AudioTurn, InboundRequest, PipelineTurn, TextTurn};
pub use error::{GenerationError, SynthesisError, TranscriptionError};
pub use rate_limit::{RateLimiter, DEFAULT_MIN_INTERVAL};
pub use traits::{ResponseGenerator, SpeechSynthesizer, Transcriber};
