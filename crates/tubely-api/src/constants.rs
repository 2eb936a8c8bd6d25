//! API constants
//!
//! Route prefixes and the multipart field names the upload endpoints expect.

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Multipart field carrying the video file
pub const VIDEO_FIELD: &str = "video";

/// Multipart field carrying the thumbnail image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Headroom on top of the largest accepted file for multipart boundaries and headers
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Extension given to staged and stored video files
pub const VIDEO_EXTENSION: &str = "mp4";

/// Content type recorded on stored video objects
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";
