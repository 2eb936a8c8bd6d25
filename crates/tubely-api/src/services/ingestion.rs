//! Video ingestion: probe, remux and publish a staged upload.
//!
//! Keeps the upload handler thin and lets the pipeline run against fake media tools
//! in tests.

use crate::constants::VIDEO_CONTENT_TYPE;
use crate::state::MediaState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::VideoStore;
use tubely_processing::{processed_path, FastStartRemuxer, VideoProber};
use tubely_storage::{video_key, Storage};

/// Scratch files belonging to one upload.
///
/// `cleanup` removes them once the request is done. If the request future is dropped
/// before that, `Drop` removes them synchronously.
pub struct StagedFiles {
    original: PathBuf,
    paths: Vec<PathBuf>,
}

impl StagedFiles {
    /// Track `original` and the path the remuxer will derive from it.
    pub fn new(original: PathBuf) -> Self {
        let paths = vec![original.clone(), processed_path(&original)];
        Self { original, paths }
    }

    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Generated name of the upload (`{hex}.mp4`)
    pub fn name(&self) -> Result<&str, AppError> {
        self.original
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Staged path has no file name: {}",
                    self.original.display()
                ))
            })
    }

    pub fn track(&mut self, path: PathBuf) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Delete every tracked file, tolerating ones that were never created.
    pub async fn cleanup(mut self) {
        for path in std::mem::take(&mut self.paths) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed staged file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove staged file"
                ),
            }
        }
    }
}

impl Drop for StagedFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Turns a staged upload into a published video.
#[derive(Clone)]
pub struct VideoIngestion {
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    prober: Arc<dyn VideoProber>,
    remuxer: Arc<dyn FastStartRemuxer>,
}

impl VideoIngestion {
    pub fn new(videos: Arc<dyn VideoStore>, media: &MediaState) -> Self {
        Self {
            videos,
            storage: media.storage.clone(),
            prober: media.prober.clone(),
            remuxer: media.remuxer.clone(),
        }
    }

    /// Probe and remux the staged file, upload the remuxed copy under
    /// `{orientation}/{name}` and point `video.video_url` at it.
    ///
    /// The record is only written after the upload returned. Staged files are left
    /// in `staged` for the caller to clean up.
    #[tracing::instrument(skip(self, video, staged), fields(video_id = %video.id))]
    pub async fn publish(&self, mut video: Video, staged: &mut StagedFiles) -> Result<Video, AppError> {
        let original = staged.original().to_path_buf();

        let orientation = self.prober.probe_orientation(&original).await?;
        tracing::debug!(orientation = %orientation, "Probed staged video");

        let processed = self.remuxer.remux_fast_start(&original).await?;
        staged.track(processed.clone());

        let storage_key = video_key(orientation, staged.name()?);
        let url = self
            .storage
            .upload_file(&storage_key, &processed, VIDEO_CONTENT_TYPE)
            .await?;

        video.video_url = Some(url);
        match self.videos.update_video(&video).await {
            Ok(updated) => {
                tracing::info!(
                    storage_key = %storage_key,
                    orientation = %orientation,
                    "Video published"
                );
                Ok(updated)
            }
            Err(e) => {
                let storage = self.storage.clone();
                tokio::spawn(async move {
                    if let Err(cleanup_err) = storage.delete(&storage_key).await {
                        tracing::warn!(
                            error = %cleanup_err,
                            storage_key = %storage_key,
                            "Failed to cleanup storage after DB error"
                        );
                    }
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_staged_files_cleanup_tolerates_missing() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("abc.mp4");
        std::fs::write(&original, b"data").unwrap();

        let staged = StagedFiles::new(original.clone());
        assert_eq!(staged.name().unwrap(), "abc.mp4");
        // the processed sibling was never written
        staged.cleanup().await;

        assert!(!original.exists());
        assert!(!dir.path().join("abc.processed.mp4").exists());
    }

    #[test]
    fn test_staged_files_drop_removes_files() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("abc.mp4");
        let extra = dir.path().join("abc.other.mp4");
        std::fs::write(&original, b"data").unwrap();
        std::fs::write(dir.path().join("abc.processed.mp4"), b"data").unwrap();
        std::fs::write(&extra, b"data").unwrap();

        {
            let mut staged = StagedFiles::new(original.clone());
            staged.track(extra.clone());
        }

        assert!(!original.exists());
        assert!(!dir.path().join("abc.processed.mp4").exists());
        assert!(!extra.exists());
    }
}
