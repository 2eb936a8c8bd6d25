use crate::error::ProcessingError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tubely_core::models::Orientation;

/// Classifies a staged video by the aspect ratio of its first video stream.
#[async_trait]
pub trait VideoProber: Send + Sync {
    async fn probe_orientation(&self, path: &Path) -> Result<Orientation, ProcessingError>;
}

/// Rewrites a video so its index (`moov` atom) precedes the media data.
///
/// Implementations write a new file next to the input and return its path.
/// The input is left untouched.
#[async_trait]
pub trait FastStartRemuxer: Send + Sync {
    async fn remux_fast_start(&self, path: &Path) -> Result<PathBuf, ProcessingError>;
}
