//! Service initialization: media tools, thumbnail store and application state.

use crate::auth::JwtConfig;
use crate::services::{DiskThumbnailStore, MemoryThumbnailStore, ThumbnailStore};
use crate::state::{AppState, MediaState, SecurityState};
use anyhow::{Context, Result};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tubely_core::{Config, ThumbnailStoreKind};
use tubely_db::VideoStore;
use tubely_processing::{FfmpegRemuxer, FfprobeProber, MediaValidator};
use tubely_storage::{LocalStorage, Storage};

pub async fn initialize_services(
    config: &Config,
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let prober = FfprobeProber::new(config.ffprobe_path()).context("Invalid FFPROBE_PATH")?;
    let remuxer = FfmpegRemuxer::new(config.ffmpeg_path()).context("Invalid FFMPEG_PATH")?;

    let staging_dir = config.staging_dir();
    tokio::fs::create_dir_all(&staging_dir)
        .await
        .with_context(|| format!("Failed to create staging directory {}", staging_dir.display()))?;

    let thumbnails = setup_thumbnail_store(config).await?;
    tracing::info!(
        thumbnail_store = %thumbnails.kind(),
        staging_dir = %staging_dir.display(),
        "Media services initialized"
    );

    let media = MediaState {
        storage,
        prober: Arc::new(prober),
        remuxer: Arc::new(remuxer),
        staging_dir,
        video_validator: MediaValidator::video(config.max_video_size_bytes()),
        thumbnail_validator: MediaValidator::thumbnail(config.max_thumbnail_size_bytes()),
    };

    Ok(Arc::new(AppState {
        config: config.clone(),
        videos,
        media,
        thumbnails,
        security: SecurityState {
            jwt: JwtConfig::new(config.jwt_secret(), config.jwt_issuer()),
        },
    }))
}

async fn setup_thumbnail_store(config: &Config) -> Result<Arc<dyn ThumbnailStore>> {
    match config.thumbnail_store() {
        ThumbnailStoreKind::Memory => {
            let capacity = NonZeroUsize::new(config.thumbnail_cache_capacity())
                .context("THUMBNAIL_CACHE_CAPACITY must be greater than zero")?;
            Ok(Arc::new(MemoryThumbnailStore::new(
                capacity,
                config.public_base_url(),
            )))
        }
        ThumbnailStoreKind::Disk => {
            let storage = LocalStorage::new(
                config.assets_root().clone(),
                format!("{}/assets", config.public_base_url()),
            )
            .await
            .context("Failed to initialize thumbnail directory")?;
            Ok(Arc::new(DiskThumbnailStore::new(storage)))
        }
    }
}
