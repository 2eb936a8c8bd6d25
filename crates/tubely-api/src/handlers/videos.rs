use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::path::VideoIdPath;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tubely_core::models::{CreateVideoRequest, Video};
use tubely_core::AppError;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video draft created", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.user_id, operation = "create_video"))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let video = Video::new(auth.user_id, request.title, request.description);
    let created = state.videos.create_video(&video).await?;

    tracing::info!(video_id = %created.id, "Video draft created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Videos owned by the caller, newest first", body = Vec<Video>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.user_id, operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state.videos.list_videos_for_user(auth.user_id).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/{videoId}",
    tag = "videos",
    params(
        ("videoId" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = Video),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(video_id = %video_id, operation = "get_video"))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
    _auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    Ok(Json(video))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{videoId}",
    tag = "videos",
    params(
        ("videoId" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(video_id = %video_id, user_id = %auth.user_id, operation = "delete_video")
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
    auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(auth.user_id) {
        return Err(AppError::Forbidden("Unauthorised user".to_string()).into());
    }

    // The stored object is kept; only the thumbnail goes with the record.
    if let Err(e) = state.thumbnails.remove(video_id).await {
        tracing::warn!(error = %e, "Failed to remove thumbnail of deleted video");
    }

    if !state.videos.delete_video(video_id).await? {
        return Err(AppError::NotFound("Couldn't find video".to_string()).into());
    }

    tracing::info!("Video deleted");
    Ok(StatusCode::NO_CONTENT)
}
