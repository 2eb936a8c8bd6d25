//! Application state and sub-states.
//!
//! AppState is split into domain sub-states so handlers reach for only what they need.
//! Every field is public so tests can assemble a state from in-memory parts.

use crate::auth::jwt::JwtConfig;
use crate::services::thumbnail_store::ThumbnailStore;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_processing::{FastStartRemuxer, MediaValidator, VideoProber};
use tubely_storage::Storage;

/// Object storage, media tools and upload limits used by the video pipeline.
#[derive(Clone)]
pub struct MediaState {
    pub storage: Arc<dyn Storage>,
    pub prober: Arc<dyn VideoProber>,
    pub remuxer: Arc<dyn FastStartRemuxer>,
    /// Scratch directory for uploads while they are probed and remuxed
    pub staging_dir: PathBuf,
    pub video_validator: MediaValidator,
    pub thumbnail_validator: MediaValidator,
}

#[derive(Clone)]
pub struct SecurityState {
    pub jwt: JwtConfig,
}

pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub media: MediaState,
    pub thumbnails: Arc<dyn ThumbnailStore>,
    pub security: SecurityState,
}
