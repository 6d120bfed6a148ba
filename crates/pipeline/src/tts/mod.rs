//! Text-to-Speech
//!
//! Replies are synthesized with the Google Translate TTS endpoint, which only
//! accepts short inputs, so text is first split into chunks and the MP3
//! responses are concatenated.

mod chunker;
mod google;

pub use chunker::split_text;
pub use google::{GoogleTts, GoogleTtsConfig};
