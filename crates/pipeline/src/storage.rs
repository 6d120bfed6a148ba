//! Upload and output directories
//!
//! Uploads are keyed by the client's (sanitized) file name and replies by the
//! upload stem or a fresh UUID. Nothing is locked: two concurrent uploads with
//! the same name write to the same paths.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sahayak_config::StorageConfig;

use crate::PipelineError;

/// Files removed by one cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub uploads_deleted: usize,
    pub outputs_deleted: usize,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.uploads_deleted + self.outputs_deleted
    }
}

/// Keep only the final path component of a client-supplied name
///
/// Both `/` and `\` count as separators. Returns `None` when nothing usable
/// remains (empty, `.` or `..`).
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(&['/', '\\'][..]).next()?.trim();

    match last {
        "" | "." | ".." => None,
        _ if last.contains('\0') => None,
        _ => Some(last.to_string()),
    }
}

/// Size of a file in megabytes (MiB)
pub async fn file_size_mb(path: impl AsRef<Path>) -> io::Result<f64> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(metadata.len() as f64 / (1024.0 * 1024.0))
}

/// The two storage directories
#[derive(Debug, Clone)]
pub struct AudioStorage {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl AudioStorage {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.upload_dir, &config.output_dir)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create both directories if missing
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tracing::debug!(
            uploads = %self.upload_dir.display(),
            outputs = %self.output_dir.display(),
            "Storage directories ready"
        );
        Ok(())
    }

    /// Write an upload under its sanitized name, replacing any previous file
    pub async fn save_upload(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, PipelineError> {
        let name = sanitize_file_name(file_name)
            .ok_or_else(|| PipelineError::InvalidInput("Invalid file name".to_string()))?;

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let path = self.upload_dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// `outputs/response_{stem}.mp3`
    pub fn response_path_for_upload(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("response_{}.mp3", stem))
    }

    /// `outputs/response_text_{uuid}.mp3`
    pub fn response_path_for_text(&self) -> PathBuf {
        self.output_dir
            .join(format!("response_text_{}.mp3", uuid::Uuid::new_v4()))
    }

    /// Path of an existing output file, or `None` if `name` is not a plain
    /// file name or nothing is there
    pub async fn resolve_output(&self, name: &str) -> Option<PathBuf> {
        if sanitize_file_name(name).as_deref() != Some(name) {
            return None;
        }

        let path = self.output_dir.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }

    /// Delete every file in both directories
    pub async fn cleanup(&self) -> Result<CleanupReport, PipelineError> {
        self.cleanup_matching(|_| true).await
    }

    /// Delete files whose modification time is at least `max_age` ago
    pub async fn cleanup_older_than(&self, max_age: Duration) -> Result<CleanupReport, PipelineError> {
        let now = SystemTime::now();
        self.cleanup_matching(move |modified| {
            modified
                .and_then(|m| now.duration_since(m).ok())
                .map_or(false, |age| age >= max_age)
        })
        .await
    }

    async fn cleanup_matching<F>(&self, should_delete: F) -> Result<CleanupReport, PipelineError>
    where
        F: Fn(Option<SystemTime>) -> bool,
    {
        let report = CleanupReport {
            uploads_deleted: clean_dir(&self.upload_dir, &should_delete).await?,
            outputs_deleted: clean_dir(&self.output_dir, &should_delete).await?,
        };

        tracing::info!(
            uploads_deleted = report.uploads_deleted,
            outputs_deleted = report.outputs_deleted,
            "Cleaned up storage"
        );
        Ok(report)
    }
}

async fn clean_dir<F>(dir: &Path, should_delete: &F) -> io::Result<usize>
where
    F: Fn(Option<SystemTime>) -> bool,
{
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut deleted = 0;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        if !should_delete(metadata.modified().ok()) {
            continue;
        }

        match tokio::fs::remove_file(entry.path()).await {
            Ok(()) => deleted += 1,
            // Removed concurrently
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> AudioStorage {
        AudioStorage::new(dir.path().join("uploads"), dir.path().join("outputs"))
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("clip.mp3").as_deref(), Some("clip.mp3"));
        assert_eq!(sanitize_file_name("a/b/clip.mp3").as_deref(), Some("clip.mp3"));
        assert_eq!(sanitize_file_name("..\\clip.mp3").as_deref(), Some("clip.mp3"));
        assert_eq!(sanitize_file_name("  spaced.wav ").as_deref(), Some("spaced.wav"));
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("dir/"), None);
    }

    #[test]
    fn test_response_paths() {
        let storage = AudioStorage::new("uploads", "outputs");

        assert_eq!(
            storage.response_path_for_upload("recording"),
            PathBuf::from("outputs/response_recording.mp3")
        );

        let a = storage.response_path_for_text();
        let b = storage.response_path_for_text();
        assert_ne!(a, b);
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("response_text_"));
        assert!(name.ends_with(".mp3"));
    }

    #[tokio::test]
    async fn test_save_and_resolve() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.ensure_dirs().await.unwrap();

        let saved = storage.save_upload("../clip.webm", b"data").await.unwrap();
        assert_eq!(saved, storage.upload_dir().join("clip.webm"));
        assert_eq!(tokio::fs::read(&saved).await.unwrap(), b"data");

        let out = storage.output_dir().join("response_clip.mp3");
        tokio::fs::write(&out, b"mp3").await.unwrap();

        assert_eq!(storage.resolve_output("response_clip.mp3").await, Some(out));
        assert_eq!(storage.resolve_output("missing.mp3").await, None);
        assert_eq!(storage.resolve_output("../uploads/clip.webm").await, None);
    }

    #[tokio::test]
    async fn test_cleanup_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.ensure_dirs().await.unwrap();

        for i in 0..3 {
            storage
                .save_upload(&format!("u{}.mp3", i), b"x")
                .await
                .unwrap();
        }
        for i in 0..2 {
            tokio::fs::write(storage.output_dir().join(format!("o{}.mp3", i)), b"y")
                .await
                .unwrap();
        }

        let first = storage.cleanup().await.unwrap();
        assert_eq!(first.uploads_deleted, 3);
        assert_eq!(first.outputs_deleted, 2);
        assert_eq!(first.total(), 5);

        let second = storage.cleanup().await.unwrap();
        assert_eq!(second, CleanupReport::default());

        // Directories survive cleanup
        assert!(storage.upload_dir().is_dir());
        assert!(storage.output_dir().is_dir());
    }

    #[tokio::test]
    async fn test_cleanup_missing_dirs() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        assert_eq!(storage.cleanup().await.unwrap().total(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_older_than_keeps_fresh_files() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.ensure_dirs().await.unwrap();
        storage.save_upload("fresh.mp3", b"x").await.unwrap();

        let report = storage
            .cleanup_older_than(Duration::from_secs(24 * 3600))
            .await
            .unwrap();
        assert_eq!(report.total(), 0);

        let report = storage.cleanup_older_than(Duration::ZERO).await.unwrap();
        assert_eq!(report.uploads_deleted, 1);
    }

    #[tokio::test]
    async fn test_file_size_mb() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("half.bin");
        tokio::fs::write(&path, vec![0u8; 512 * 1024]).await.unwrap();

        assert!((file_size_mb(&path).await.unwrap() - 0.5).abs() < f64::EPSILON);
    }
}
