//! Upload checks run before anything is written or sent

use std::path::Path;

use sahayak_config::StorageConfig;
use sahayak_core::AudioFormat;

use crate::storage::sanitize_file_name;
use crate::PipelineError;

/// Which uploads are accepted
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_upload_bytes: usize,
    /// Extensions with leading dot, compared case-insensitively
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            allowed_extensions: config.allowed_extensions.clone(),
        }
    }

    fn allows(&self, ext: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    fn invalid_format(&self) -> PipelineError {
        PipelineError::InvalidInput(format!(
            "Invalid file format. Allowed formats: {}",
            self.allowed_extensions.join(", ")
        ))
    }

    /// Check name, extension and size of an upload
    ///
    /// The extension is checked first so a wrong format is reported even for
    /// an empty or oversized body.
    pub fn validate(&self, filename: &str, size: usize) -> Result<ValidatedUpload, PipelineError> {
        let file_name = sanitize_file_name(filename)
            .ok_or_else(|| PipelineError::InvalidInput("Invalid file name".to_string()))?;

        let format = AudioFormat::from_file_name(&file_name)
            .filter(|f| self.allows(f.extension()))
            .ok_or_else(|| self.invalid_format())?;

        if size == 0 {
            return Err(PipelineError::InvalidInput("Empty audio file".to_string()));
        }
        if size > self.max_upload_bytes {
            return Err(PipelineError::PayloadTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let stem = Path::new(&file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio")
            .to_string();

        Ok(ValidatedUpload {
            file_name,
            stem,
            format,
        })
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&StorageConfig::default())
    }
}

/// An upload that passed [`UploadPolicy::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    /// Final path component of the client's file name
    pub file_name: String,
    /// File name without its extension; keys the reply audio
    pub stem: String,
    pub format: AudioFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_formats() {
        let policy = UploadPolicy::default();

        let upload = policy.validate("recording.webm", 1024).unwrap();
        assert_eq!(upload.file_name, "recording.webm");
        assert_eq!(upload.stem, "recording");
        assert_eq!(upload.format, AudioFormat::Webm);

        let upload = policy.validate("Voice Note.M4A", 10).unwrap();
        assert_eq!(upload.stem, "Voice Note");
        assert_eq!(upload.format, AudioFormat::M4a);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let policy = UploadPolicy::default();

        for name in ["notes.txt", "song.flac", "noextension"] {
            match policy.validate(name, 100) {
                Err(PipelineError::InvalidInput(msg)) => {
                    assert!(msg.starts_with("Invalid file format. Allowed formats: .mp3"));
                }
                other => panic!("expected InvalidInput for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_extension_checked_before_size() {
        let policy = UploadPolicy::default();
        let err = policy.validate("notes.txt", 0).unwrap_err();
        assert!(err.to_string().starts_with("Invalid file format"));
    }

    #[test]
    fn test_rejects_empty_and_oversize() {
        let policy = UploadPolicy {
            max_upload_bytes: 10,
            ..UploadPolicy::default()
        };

        assert!(matches!(
            policy.validate("a.mp3", 0),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            policy.validate("a.mp3", 11),
            Err(PipelineError::PayloadTooLarge { size: 11, limit: 10 })
        ));
        assert!(policy.validate("a.mp3", 10).is_ok());
    }

    #[test]
    fn test_path_components_are_stripped() {
        let policy = UploadPolicy::default();

        let upload = policy.validate("../../etc/evil.mp3", 5).unwrap();
        assert_eq!(upload.file_name, "evil.mp3");

        let upload = policy.validate("C:\\Users\\me\\clip.wav", 5).unwrap();
        assert_eq!(upload.file_name, "clip.wav");

        assert!(policy.validate("../", 5).is_err());
    }
}
