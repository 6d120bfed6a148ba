//! Request and turn types flowing through the pipeline

use serde::{Deserialize, Serialize};

use crate::audio::AudioArtifact;

/// One inbound request, built per call and dropped once the pipeline is done
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundRequest {
    /// An uploaded recording
    Audio { bytes: Vec<u8>, filename: String },
    /// Text already transcribed on the client (e.g. Web Speech API)
    Text { text: String },
}

impl InboundRequest {
    pub fn audio(bytes: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self::Audio {
            bytes: bytes.into(),
            filename: filename.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Result of the audio-upload path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTurn {
    /// Transcript of the uploaded audio
    pub transcript: String,
    /// Generated Hindi reply
    pub reply_text: String,
    /// Synthesized reply audio
    pub audio: AudioArtifact,
}

/// Result of the text path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextTurn {
    /// Text as submitted by the caller
    pub original_text: String,
    /// Generated Hindi reply
    pub reply_text: String,
    /// Synthesized reply audio
    pub audio: AudioArtifact,
}

/// Either turn, as returned when dispatching an [`InboundRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineTurn {
    Audio(AudioTurn),
    Text(TextTurn),
}

impl PipelineTurn {
    /// The user's words: the transcript or the submitted text
    pub fn user_text(&self) -> &str {
        match self {
            PipelineTurn::Audio(t) => &t.transcript,
            PipelineTurn::Text(t) => &t.original_text,
        }
    }

    pub fn reply_text(&self) -> &str {
        match self {
            PipelineTurn::Audio(t) => &t.reply_text,
            PipelineTurn::Text(t) => &t.reply_text,
        }
    }

    pub fn audio(&self) -> &AudioArtifact {
        match self {
            PipelineTurn::Audio(t) => &t.audio,
            PipelineTurn::Text(t) => &t.audio,
        }
    }
}
