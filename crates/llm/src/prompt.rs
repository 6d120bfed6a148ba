//! Fixed prompts and request builders

use crate::gemini::{Content, GenerateContentRequest, Part};

/// Instruction sent alongside every recording
pub const TRANSCRIPTION_PROMPT: &str =
    "Transcribe this Hindi audio accurately. Return ONLY the Devanagari text without explanations.";

/// Persona for reply generation
pub const ASSISTANT_INSTRUCTION: &str = "You are a helpful Hindi-speaking AI assistant.
Respond ONLY in Hindi (Devanagari script).
Keep responses concise (2-3 sentences).
Be polite and helpful.";

/// Build a transcription request from already encoded audio
pub fn transcription_request(audio_base64: String, mime_type: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::text(TRANSCRIPTION_PROMPT),
            Part::inline_data(mime_type, audio_base64),
        ])],
        system_instruction: None,
    }
}

/// Build a reply request for the user's utterance
pub fn reply_request(user_input: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(vec![Part::text(user_input)])],
        system_instruction: Some(Content::system(ASSISTANT_INSTRUCTION)),
    }
}
