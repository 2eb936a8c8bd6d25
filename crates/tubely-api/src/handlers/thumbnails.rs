use crate::auth::AuthUser;
use crate::constants::THUMBNAIL_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::state::AppState;
use crate::utils::path::VideoIdPath;
use crate::utils::upload::{multipart_error, read_field_limited, validate_file_field};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tubely_core::models::{Thumbnail, Video};
use tubely_core::AppError;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/thumbnails/{videoId}",
    tag = "thumbnails",
    params(
        ("videoId" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Thumbnail bytes with their stored media type"),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 404, description = "Unknown video or no thumbnail uploaded", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %video_id, operation = "get_thumbnail"))]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    let thumbnail = state
        .thumbnails
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

    Ok((
        [
            (CONTENT_TYPE, thumbnail.media_type),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        thumbnail.data,
    ))
}

#[utoipa::path(
    post,
    path = "/api/thumbnails/{videoId}",
    tag = "thumbnails",
    params(
        ("videoId" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "PNG or JPEG image in the `thumbnail` field"),
    responses(
        (status = 200, description = "Thumbnail stored", body = Video),
        (status = 400, description = "Invalid input, unsupported media type or unknown video", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(video_id = %video_id, user_id = %auth.user_id, operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
    auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::InvalidInput(format!("Invalid multipart request: {}", rejection.body_text()))
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let validator = &state.media.thumbnail_validator;
        let media_type = validate_file_field(&field, validator)?;
        let data = read_field_limited(field, validator).await?;

        let mut video = load_owned_video(&state, video_id, auth.user_id).await?;

        let size = data.len();
        let url = state
            .thumbnails
            .put(video_id, Thumbnail::new(data, media_type))
            .await?;
        video.thumbnail_url = Some(url);
        let updated = state.videos.update_video(&video).await?;

        tracing::info!(size_bytes = size, "Thumbnail stored");
        return Ok(Json(updated));
    }

    Err(AppError::InvalidInput("Invalid file type".to_string()).into())
}
