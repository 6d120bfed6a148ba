//! Centralized constants for the assistant
//!
//! Single source of truth for application metadata and the default values
//! used by `Settings`.

/// Application metadata served by `/` and `/health`
pub mod app {
    pub const TITLE: &str = "Hindi-Speaking AI Assistant";

    pub const DESCRIPTION: &str =
        "AI Assistant with Hindi Speech-to-Text, LLM Response, and Text-to-Speech";

    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Service endpoints
pub mod endpoints {
    /// Gemini REST API base (v1beta)
    pub const GEMINI_DEFAULT: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Google Translate host serving `translate_tts`
    pub const GOOGLE_TTS_DEFAULT: &str = "https://translate.google.com";
}

/// Model defaults
pub mod models {
    pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

    /// Placeholder shipped in `.env.example`; treated as missing
    pub const API_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";
}

/// Timeouts and pacing
pub mod timeouts {
    /// Gemini request timeout (seconds)
    pub const GEMINI_REQUEST_SECS: u64 = 60;

    /// TTS request timeout (seconds)
    pub const TTS_REQUEST_SECS: u64 = 30;

    /// Minimum gap between Gemini calls (ms)
    pub const MIN_REQUEST_INTERVAL_MS: u64 = 2_000;
}

/// Upload and storage defaults
pub mod storage {
    /// 25 MiB
    pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

    pub const ALLOWED_AUDIO_EXTENSIONS: &[&str] =
        &[".mp3", ".wav", ".m4a", ".ogg", ".webm", ".weba"];

    pub const UPLOAD_DIR: &str = "uploads";

    pub const OUTPUT_DIR: &str = "outputs";
}

/// Speech synthesis defaults
pub mod tts {
    pub const LANGUAGE: &str = "hi";

    /// Longest text the TTS endpoint accepts per request
    pub const MAX_CHUNK_CHARS: usize = 100;

    /// Hard ceiling accepted by validation
    pub const MAX_CHUNK_CHARS_LIMIT: usize = 200;
}
