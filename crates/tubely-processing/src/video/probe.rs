use super::tools::{canonical_input, validate_tool_path};
use crate::error::ProcessingError;
use crate::traits::VideoProber;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tubely_core::models::Orientation;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Read `(width, height)` of the first stream from ffprobe's JSON output
pub(crate) fn parse_dimensions(stdout: &[u8]) -> Result<(u32, u32), ProcessingError> {
    let output: ProbeOutput = serde_json::from_slice(stdout).map_err(|e| {
        ProcessingError::ProbeFailed(format!("Failed to parse ffprobe output: {}", e))
    })?;

    let stream = output
        .streams
        .first()
        .ok_or_else(|| ProcessingError::ProbeFailed("No video stream found".to_string()))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok((width, height)),
        (width, height) => Err(ProcessingError::ProbeFailed(format!(
            "Invalid video dimensions: {:?}x{:?}",
            width, height
        ))),
    }
}

/// Aspect-ratio prober backed by `ffprobe`
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self, ProcessingError> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl VideoProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe_orientation(&self, path: &Path) -> Result<Orientation, ProcessingError> {
        let start = std::time::Instant::now();
        let input =
            canonical_input(path).map_err(|e| ProcessingError::ProbeFailed(e.to_string()))?;

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height",
                "-of",
                "json",
            ])
            .arg(&input)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProcessingError::ProbeFailed(format!("Failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                status = %output.status,
                stderr = %stderr,
                "ffprobe failed"
            );
            return Err(ProcessingError::ProbeFailed(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let (width, height) = parse_dimensions(&output.stdout)?;
        let orientation = Orientation::from_dimensions(width, height);

        tracing::info!(
            width = width,
            height = height,
            orientation = %orientation,
            duration_ms = start.elapsed().as_millis(),
            "Video probe completed"
        );

        Ok(orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        let json = br#"{"programs": [], "streams": [{"width": 1920, "height": 1080}]}"#;
        assert_eq!(parse_dimensions(json).unwrap(), (1920, 1080));
    }

    #[test]
    fn test_parse_dimensions_rejects_missing_stream() {
        assert!(matches!(
            parse_dimensions(br#"{"streams": []}"#),
            Err(ProcessingError::ProbeFailed(_))
        ));
        assert!(matches!(
            parse_dimensions(br#"{}"#),
            Err(ProcessingError::ProbeFailed(_))
        ));
    }

    #[test]
    fn test_parse_dimensions_rejects_zero_or_missing_dimensions() {
        assert!(parse_dimensions(br#"{"streams": [{"width": 0, "height": 1080}]}"#).is_err());
        assert!(parse_dimensions(br#"{"streams": [{"width": 1080}]}"#).is_err());
    }

    #[test]
    fn test_parse_dimensions_rejects_garbage() {
        assert!(parse_dimensions(b"").is_err());
        assert!(parse_dimensions(b"not json").is_err());
    }

    #[test]
    fn test_new_rejects_unsafe_tool_path() {
        assert!(FfprobeProber::new("ffprobe && curl evil").is_err());
        assert!(FfprobeProber::new("ffprobe").is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_non_zero_exit_is_probe_failed() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("staged.mp4");
        std::fs::write(&video, b"not really a video").unwrap();

        let prober = FfprobeProber::new("false").unwrap();
        assert!(matches!(
            prober.probe_orientation(&video).await,
            Err(ProcessingError::ProbeFailed(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_empty_output_is_probe_failed() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("staged.mp4");
        std::fs::write(&video, b"not really a video").unwrap();

        let prober = FfprobeProber::new("true").unwrap();
        assert!(matches!(
            prober.probe_orientation(&video).await,
            Err(ProcessingError::ProbeFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_missing_binary_is_probe_failed() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("staged.mp4");
        std::fs::write(&video, b"x").unwrap();

        let prober = FfprobeProber::new("tubely-no-such-ffprobe").unwrap();
        assert!(matches!(
            prober.probe_orientation(&video).await,
            Err(ProcessingError::ProbeFailed(_))
        ));
    }
}
