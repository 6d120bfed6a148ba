//! Core traits for the assistant's remote backends
//!
//! Each remote capability sits behind a trait so that:
//! - backends are constructed explicitly and injected into the pipeline
//! - tests can swap in stubs that count calls
//!
//! # Trait Hierarchy
//!
//! ```text
//! Speech Processing:
//!   - Transcriber: Audio → Hindi text
//!   - SpeechSynthesizer: Hindi text → audio file
//!
//! Language Models:
//!   - ResponseGenerator: Hindi text → Hindi reply
//! ```

mod llm;
mod speech;

pub use llm::ResponseGenerator;
pub use speech::{SpeechSynthesizer, Transcriber};
