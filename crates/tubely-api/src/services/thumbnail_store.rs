//! Thumbnail persistence
//!
//! Two interchangeable stores sit behind [`ThumbnailStore`]:
//! - [`MemoryThumbnailStore`] keeps the bytes in a bounded LRU cache and serves them
//!   back through `GET /api/thumbnails/{videoId}`.
//! - [`DiskThumbnailStore`] writes each upload to the assets root under a random name
//!   and serves it as a static asset.

use crate::constants::API_PREFIX;
use crate::utils::upload::random_file_name;
use async_trait::async_trait;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tokio::sync::{Mutex, RwLock};
use tubely_core::models::Thumbnail;
use tubely_core::{AppError, ThumbnailStoreKind};
use tubely_storage::{LocalStorage, Storage};
use uuid::Uuid;

/// Keyed storage for the latest thumbnail of each video.
#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// Store (or replace) the thumbnail of `video_id` and return the URL it is served at.
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<String, AppError>;

    async fn get(&self, video_id: Uuid) -> Result<Option<Thumbnail>, AppError>;

    /// Forget the thumbnail of `video_id`. Missing entries are not an error.
    async fn remove(&self, video_id: Uuid) -> Result<(), AppError>;

    fn kind(&self) -> ThumbnailStoreKind;
}

pub struct MemoryThumbnailStore {
    cache: Mutex<LruCache<Uuid, Thumbnail>>,
    public_base_url: String,
}

impl MemoryThumbnailStore {
    pub fn new(capacity: NonZeroUsize, public_base_url: impl Into<String>) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, video_id: Uuid) -> String {
        format!("{}{}/thumbnails/{}", self.public_base_url, API_PREFIX, video_id)
    }
}

#[async_trait]
impl ThumbnailStore for MemoryThumbnailStore {
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<String, AppError> {
        let mut cache = self.cache.lock().await;
        if let Some((evicted, _)) = cache.push(video_id, thumbnail) {
            if evicted != video_id {
                tracing::debug!(video_id = %evicted, "Evicted thumbnail from cache");
            }
        }
        Ok(self.url_for(video_id))
    }

    async fn get(&self, video_id: Uuid) -> Result<Option<Thumbnail>, AppError> {
        let mut cache = self.cache.lock().await;
        Ok(cache.get(&video_id).cloned())
    }

    async fn remove(&self, video_id: Uuid) -> Result<(), AppError> {
        self.cache.lock().await.pop(&video_id);
        Ok(())
    }

    fn kind(&self) -> ThumbnailStoreKind {
        ThumbnailStoreKind::Memory
    }
}

/// Stored file of one thumbnail
#[derive(Debug, Clone)]
struct DiskEntry {
    key: String,
    media_type: String,
}

pub struct DiskThumbnailStore {
    storage: LocalStorage,
    entries: RwLock<HashMap<Uuid, DiskEntry>>,
}

impl DiskThumbnailStore {
    /// `storage` should be rooted at the directory served under `/assets`.
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ThumbnailStore for DiskThumbnailStore {
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail) -> Result<String, AppError> {
        let key = random_file_name(thumbnail.extension());
        let url = self
            .storage
            .upload(&key, thumbnail.data.clone(), &thumbnail.media_type)
            .await?;

        let previous = self.entries.write().await.insert(
            video_id,
            DiskEntry {
                key,
                media_type: thumbnail.media_type,
            },
        );

        if let Some(previous) = previous {
            if let Err(e) = self.storage.delete(&previous.key).await {
                tracing::warn!(
                    error = %e,
                    storage_key = %previous.key,
                    "Failed to delete replaced thumbnail"
                );
            }
        }

        Ok(url)
    }

    async fn get(&self, video_id: Uuid) -> Result<Option<Thumbnail>, AppError> {
        let entry = match self.entries.read().await.get(&video_id) {
            Some(entry) => entry.clone(),
            None => return Ok(None),
        };

        let path = self.storage.base_path().join(&entry.key);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Thumbnail::new(data, entry.media_type))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read thumbnail {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn remove(&self, video_id: Uuid) -> Result<(), AppError> {
        let entry = self.entries.write().await.remove(&video_id);
        if let Some(entry) = entry {
            self.storage.delete(&entry.key).await?;
        }
        Ok(())
    }

    fn kind(&self) -> ThumbnailStoreKind {
        ThumbnailStoreKind::Disk
    }
}
