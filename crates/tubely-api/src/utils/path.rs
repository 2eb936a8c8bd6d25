use crate::error::HttpAppError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use tubely_core::AppError;
use uuid::Uuid;

/// `{videoId}` path segment parsed as a UUID.
///
/// Rejects with 400 "Invalid video ID" instead of axum's plain-text path rejection.
#[derive(Debug, Clone, Copy)]
pub struct VideoIdPath(pub Uuid);

fn invalid_video_id() -> HttpAppError {
    HttpAppError(AppError::InvalidInput("Invalid video ID".to_string()))
}

impl<S> FromRequestParts<S> for VideoIdPath
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_video_id())?;

        let raw = raw.trim();
        if raw.is_empty() {
            return Err(invalid_video_id());
        }

        Uuid::parse_str(raw)
            .map(VideoIdPath)
            .map_err(|_| invalid_video_id())
    }
}
