//! Common utilities for multipart upload handlers

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tubely_core::AppError;
use tubely_processing::MediaValidator;

const GIB: usize = 1024 * 1024 * 1024;
const MIB: usize = 1024 * 1024;

/// Random file name: 32 random bytes, hex-encoded, plus `.{extension}`.
pub fn random_file_name(extension: &str) -> String {
    let bytes: [u8; 32] = rand::random();
    format!("{}.{}", hex::encode(bytes), extension)
}

/// Map a multipart read failure, keeping body-limit rejections as 413.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(err.body_text());
    }
    AppError::InvalidInput(format!("Failed to read multipart: {}", err))
}

/// Human readable size limit ("1GB", "10MB")
fn format_limit(max: usize) -> String {
    if max >= GIB && max % GIB == 0 {
        format!("{}GB", max / GIB)
    } else if max >= MIB && max % MIB == 0 {
        format!("{}MB", max / MIB)
    } else {
        format!("{} bytes", max)
    }
}

pub fn file_too_large(max: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "File too large and must not exceed {} in size",
        format_limit(max)
    ))
}

/// Check that `field` carries a file and that its declared media type is allowed.
///
/// Returns the normalized media type.
pub fn validate_file_field(field: &Field<'_>, validator: &MediaValidator) -> Result<String, AppError> {
    if field.file_name().is_none() {
        return Err(AppError::InvalidInput("Invalid file type".to_string()));
    }

    let content_type = field
        .content_type()
        .ok_or_else(|| AppError::InvalidInput("Missing Content-Type for file".to_string()))?;

    Ok(validator.validate_content_type(content_type)?)
}

/// Stream a multipart field into `dest`, enforcing the validator's size limit.
///
/// Stops reading as soon as the limit is crossed. The partially written file is left
/// for the caller to remove. Returns the number of bytes written.
pub async fn stage_field_to_file(
    mut field: Field<'_>,
    dest: &Path,
    validator: &MediaValidator,
) -> Result<usize, AppError> {
    let max = validator.max_file_size();
    let mut file = tokio::fs::File::create(dest).await.map_err(|e| {
        AppError::Internal(format!("Failed to create staged file {}: {}", dest.display(), e))
    })?;

    let mut written = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        written += chunk.len();
        if written > max {
            return Err(file_too_large(max));
        }
        file.write_all(&chunk).await.map_err(|e| {
            AppError::Internal(format!("Failed to write staged file {}: {}", dest.display(), e))
        })?;
    }

    file.flush().await.map_err(|e| {
        AppError::Internal(format!("Failed to flush staged file {}: {}", dest.display(), e))
    })?;

    validator.validate_file_size(written)?;
    Ok(written)
}

/// Read a multipart field into memory, enforcing the validator's size limit.
pub async fn read_field_limited(
    mut field: Field<'_>,
    validator: &MediaValidator,
) -> Result<Bytes, AppError> {
    let max = validator.max_file_size();
    let mut data = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max {
            return Err(file_too_large(max));
        }
        data.extend_from_slice(&chunk);
    }

    validator.validate_file_size(data.len())?;
    Ok(Bytes::from(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_file_name() {
        let name = random_file_name("mp4");
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "mp4");
        assert_eq!(stem.len(), 64);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(name, random_file_name("mp4"));
    }

    #[test]
    fn test_file_too_large_message() {
        match file_too_large(GIB) {
            AppError::PayloadTooLarge(msg) => {
                assert_eq!(msg, "File too large and must not exceed 1GB in size")
            }
            other => panic!("Expected PayloadTooLarge, got {:?}", other),
        }
        match file_too_large(10 * MIB) {
            AppError::PayloadTooLarge(msg) => {
                assert_eq!(msg, "File too large and must not exceed 10MB in size")
            }
            other => panic!("Expected PayloadTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_format_limit_odd_sizes() {
        assert_eq!(format_limit(1536), "1536 bytes");
        assert_eq!(format_limit(3 * MIB), "3MB");
    }
}
