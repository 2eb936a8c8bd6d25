//! Fake prober and remuxer standing in for ffprobe/ffmpeg.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tubely_core::models::Orientation;
use tubely_processing::{processed_path, FastStartRemuxer, ProcessingError, VideoProber};

/// Bytes the fake remuxer prepends to the staged file
pub const REMUX_MARKER: &[u8] = b"faststart:";

pub struct FakeMediaTools {
    pub orientation: Orientation,
    pub fail_probe: bool,
    pub fail_remux: bool,
    /// Staged paths seen by the prober
    pub probed: Mutex<Vec<PathBuf>>,
}

impl Default for FakeMediaTools {
    fn default() -> Self {
        Self {
            orientation: Orientation::Landscape,
            fail_probe: false,
            fail_remux: false,
            probed: Mutex::new(Vec::new()),
        }
    }
}

impl FakeMediaTools {
    pub fn with_orientation(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn failing_probe() -> Self {
        Self {
            fail_probe: true,
            ..Self::default()
        }
    }

    pub fn failing_remux() -> Self {
        Self {
            fail_remux: true,
            ..Self::default()
        }
    }

    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoProber for FakeMediaTools {
    async fn probe_orientation(&self, path: &Path) -> Result<Orientation, ProcessingError> {
        self.probed.lock().unwrap().push(path.to_path_buf());
        if !path.exists() {
            return Err(ProcessingError::ProbeFailed(format!(
                "{} does not exist",
                path.display()
            )));
        }
        if self.fail_probe {
            return Err(ProcessingError::ProbeFailed(
                "ffprobe exited with status 1: Invalid data found when processing input".into(),
            ));
        }
        Ok(self.orientation)
    }
}

#[async_trait]
impl FastStartRemuxer for FakeMediaTools {
    async fn remux_fast_start(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        let output = processed_path(path);
        if self.fail_remux {
            // leave a partial output behind like a crashed ffmpeg would
            std::fs::write(&output, b"partial").map_err(|e| {
                ProcessingError::RemuxFailed(format!("failed to write partial output: {}", e))
            })?;
            return Err(ProcessingError::RemuxFailed(
                "ffmpeg exited with status 1: moov atom not found".into(),
            ));
        }

        let original = std::fs::read(path)
            .map_err(|e| ProcessingError::RemuxFailed(format!("failed to read input: {}", e)))?;
        let mut remuxed = REMUX_MARKER.to_vec();
        remuxed.extend_from_slice(&original);
        std::fs::write(&output, remuxed)
            .map_err(|e| ProcessingError::RemuxFailed(format!("failed to write output: {}", e)))?;
        Ok(output)
    }
}
