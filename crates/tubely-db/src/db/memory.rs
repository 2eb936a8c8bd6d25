use super::store::VideoStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::{models::Video, AppError};
use uuid::Uuid;

/// Video records kept in a process-local map.
///
/// Nothing survives a restart.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoRepository {
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::BadRequest(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(video.clone())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut owned: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        stored.title = video.title.clone();
        stored.description = video.description.clone();
        stored.thumbnail_url = video.thumbnail_url.clone();
        stored.video_url = video.video_url.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete_video(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.videos.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
