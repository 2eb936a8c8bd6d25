//! OpenAPI documentation served at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

/// Registers the bearer JWT scheme referenced by the protected endpoints.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video hosting API: create video drafts, upload mp4 files that are remuxed for fast start and published to object storage, and attach thumbnails."
    ),
    paths(
        // Videos
        handlers::videos::create_video,
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::videos::delete_video,
        handlers::video_upload::upload_video,
        // Thumbnails
        handlers::thumbnails::get_thumbnail,
        handlers::thumbnails::upload_thumbnail,
    ),
    components(
        schemas(
            models::Video,
            models::CreateVideoRequest,
            models::Orientation,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video drafts and video file uploads"),
        (name = "thumbnails", description = "Thumbnail upload and retrieval")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_upload_paths() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/videos/{videoId}"));
        assert!(spec.paths.paths.contains_key("/api/thumbnails/{videoId}"));
        assert!(spec.paths.paths.contains_key("/api/videos"));

        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
