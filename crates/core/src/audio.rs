//! Audio formats and synthesized artifacts

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Content type of every synthesized reply
pub const MPEG_CONTENT_TYPE: &str = "audio/mpeg";

/// Upload container formats accepted by the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    M4a,
    Ogg,
    Webm,
    /// WebM audio as produced by browser recorders
    Weba,
}

impl AudioFormat {
    /// Parse from a file extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "m4a" => Some(AudioFormat::M4a),
            "ogg" => Some(AudioFormat::Ogg),
            "webm" => Some(AudioFormat::Webm),
            "weba" => Some(AudioFormat::Weba),
            _ => None,
        }
    }

    /// Parse from a file name's extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// MIME type sent alongside inline audio to the inference service
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mp3",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::M4a => "audio/mp4",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Webm | AudioFormat::Weba => "audio/webm",
        }
    }

    /// Canonical extension including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => ".mp3",
            AudioFormat::Wav => ".wav",
            AudioFormat::M4a => ".m4a",
            AudioFormat::Ogg => ".ogg",
            AudioFormat::Webm => ".webm",
            AudioFormat::Weba => ".weba",
        }
    }
}

/// A synthesized audio file on local disk
///
/// Owned by the pipeline until it is handed to the HTTP layer, after which
/// the file belongs to the storage directories and lives until cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioArtifact {
    /// Absolute or storage-relative path of the file
    pub path: PathBuf,
    /// Bare file name used to address the artifact over HTTP
    pub file_name: String,
    /// MIME type of the file contents
    pub content_type: String,
}

impl AudioArtifact {
    /// Describe an MP3 file at `path`
    pub fn mpeg(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            content_type: MPEG_CONTENT_TYPE.to_string(),
        }
    }

    /// URL under which the HTTP layer serves this artifact
    pub fn url(&self) -> String {
        format!("/api/audio/{}", self.file_name)
    }
}
