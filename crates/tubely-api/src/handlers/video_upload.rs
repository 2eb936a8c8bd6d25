use crate::auth::AuthUser;
use crate::constants::{VIDEO_EXTENSION, VIDEO_FIELD};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::load_owned_video;
use crate::services::{StagedFiles, VideoIngestion};
use crate::state::AppState;
use crate::utils::path::VideoIdPath;
use crate::utils::upload::{
    multipart_error, random_file_name, stage_field_to_file, validate_file_field,
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/videos/{videoId}",
    tag = "videos",
    params(
        ("videoId" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "mp4 file in the `video` field"),
    responses(
        (status = 200, description = "Video uploaded and published", body = Video),
        (status = 400, description = "Invalid input, unsupported media type or unknown video", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Probe, remux or storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(video_id = %video_id, user_id = %auth.user_id, operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
    auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::InvalidInput(format!("Invalid multipart request: {}", rejection.body_text()))
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let validator = &state.media.video_validator;
        let media_type = validate_file_field(&field, validator)?;
        let video = load_owned_video(&state, video_id, auth.user_id).await?;

        let staged_path = state
            .media
            .staging_dir
            .join(random_file_name(VIDEO_EXTENSION));
        let mut staged = StagedFiles::new(staged_path);

        let size = match stage_field_to_file(field, staged.original(), validator).await {
            Ok(size) => size,
            Err(e) => {
                staged.cleanup().await;
                return Err(e.into());
            }
        };
        tracing::info!(
            size_bytes = size,
            media_type = %media_type,
            "Video staged"
        );

        let ingestion = VideoIngestion::new(state.videos.clone(), &state.media);
        let result = ingestion.publish(video, &mut staged).await;
        staged.cleanup().await;

        return Ok(Json(result?));
    }

    Err(AppError::InvalidInput("Invalid file type".to_string()).into())
}
