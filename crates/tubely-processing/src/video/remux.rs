use super::tools::{canonical_input, validate_tool_path};
use crate::error::ProcessingError;
use crate::traits::FastStartRemuxer;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Output path for a remuxed file: `<stem>.processed.<ext>` beside the input
pub fn processed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    input.with_file_name(format!("{}.processed.{}", stem, ext))
}

/// Fast-start remuxer backed by `ffmpeg` stream copy
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self, ProcessingError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self { ffmpeg_path })
    }
}

#[async_trait]
impl FastStartRemuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux_fast_start(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        let start = std::time::Instant::now();
        let input =
            canonical_input(path).map_err(|e| ProcessingError::RemuxFailed(e.to_string()))?;
        let output_path = processed_path(&input);

        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(&input)
            .args([
                "-movflags",
                "faststart",
                "-map_metadata",
                "0",
                "-codec",
                "copy",
                "-f",
                "mp4",
            ])
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProcessingError::RemuxFailed(format!("Failed to execute ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                status = %output.status,
                stderr = %stderr,
                "ffmpeg faststart remux failed"
            );
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(ProcessingError::RemuxFailed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if !tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            return Err(ProcessingError::RemuxFailed(format!(
                "ffmpeg produced no output at {}",
                output_path.display()
            )));
        }

        tracing::info!(
            output = %output_path.display(),
            duration_ms = start.elapsed().as_millis(),
            "Video faststart remux completed"
        );

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_path() {
        assert_eq!(
            processed_path(Path::new("/srv/assets/tmp/abc123.mp4")),
            PathBuf::from("/srv/assets/tmp/abc123.processed.mp4")
        );
        assert_eq!(
            processed_path(Path::new("tmp/upload")),
            PathBuf::from("tmp/upload.processed.mp4")
        );
    }

    #[test]
    fn test_new_rejects_unsafe_tool_path() {
        assert!(FfmpegRemuxer::new("ffmpeg | nc host 1").is_err());
        assert!(FfmpegRemuxer::new("/opt/ffmpeg/bin/ffmpeg").is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remux_non_zero_exit_is_remux_failed() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("staged.mp4");
        std::fs::write(&video, b"x").unwrap();

        let remuxer = FfmpegRemuxer::new("false").unwrap();
        assert!(matches!(
            remuxer.remux_fast_start(&video).await,
            Err(ProcessingError::RemuxFailed(_))
        ));
        assert!(video.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remux_success_without_output_is_remux_failed() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("staged.mp4");
        std::fs::write(&video, b"x").unwrap();

        let remuxer = FfmpegRemuxer::new("true").unwrap();
        assert!(matches!(
            remuxer.remux_fast_start(&video).await,
            Err(ProcessingError::RemuxFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_remux_missing_input_is_remux_failed() {
        let dir = tempfile::tempdir().unwrap();
        let remuxer = FfmpegRemuxer::new("ffmpeg").unwrap();
        assert!(matches!(
            remuxer.remux_fast_start(&dir.path().join("gone.mp4")).await,
            Err(ProcessingError::RemuxFailed(_))
        ));
    }
}
