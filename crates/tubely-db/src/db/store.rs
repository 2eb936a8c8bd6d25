use async_trait::async_trait;
use tubely_core::{models::Video, AppError};
use uuid::Uuid;

/// Read/write access to video records.
///
/// Handlers only depend on this trait so the backing store can be swapped.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a new record and return it as stored
    async fn create_video(&self, video: &Video) -> Result<Video, AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// All videos owned by `user_id`, newest first
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Persist the mutable fields of `video` and bump `updated_at`.
    ///
    /// Returns `AppError::NotFound` if the record no longer exists.
    async fn update_video(&self, video: &Video) -> Result<Video, AppError>;

    /// Returns whether a record was deleted
    async fn delete_video(&self, id: Uuid) -> Result<bool, AppError>;

    /// Cheap round-trip used by readiness probes
    async fn health_check(&self) -> Result<(), AppError>;
}
