pub mod thumbnails;
pub mod video_upload;
pub mod videos;

use crate::state::AppState;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

/// Load a video for modification by `user_id`.
///
/// A missing record is a bad request on the upload paths; a record owned by someone
/// else is forbidden.
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video, AppError> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Video not found".to_string()))?;

    if !video.is_owned_by(user_id) {
        return Err(AppError::Forbidden("Unauthorised user".to_string()));
    }

    Ok(video)
}
